//! Derives the subtotals and net total from a draft.

use crate::drawer::draft::Draft;

/// The subtotals and net total for a [Draft].
///
/// Always produced by [derive_totals], never edited directly.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DerivedTotals {
    /// The dollar value of all bills.
    pub bills_subtotal: f64,
    /// The dollar value of all coins.
    pub coins_subtotal: f64,
    /// The sum of every pay-out amount.
    pub pay_out_subtotal: f64,
    /// The ATH amount rounded to cents.
    pub ath_subtotal: f64,
    /// Shown on the form for reference only.
    pub lecture_subtotal: f64,
    /// The petty cash rounded to cents.
    pub petty_cash_subtotal: f64,
    /// Bills, coins and ATH minus pay-outs and petty cash.
    pub net_total: f64,
}

/// Round `amount` to cents, with halves rounded up.
pub fn round2(amount: f64) -> f64 {
    (amount * 100.0 + 0.5).floor() / 100.0
}

/// Compute every subtotal and the net total for `draft`.
///
/// Each addend is rounded to cents before the net total is summed, and the
/// sum is rounded again, which keeps float artifacts such as
/// `0.1 + 0.2 = 0.30000000000000004` out of the results.
pub fn derive_totals(draft: &Draft) -> DerivedTotals {
    let bills = draft.bill20 * 20.0 + draft.bill10 * 10.0 + draft.bill5 * 5.0 + draft.bill1;
    let coins =
        draft.coin25 * 0.25 + draft.coin10 * 0.10 + draft.coin5 * 0.05 + draft.coin1 * 0.01;
    let pay_outs: f64 = draft.pay_outs.iter().map(|pay_out| pay_out.amount).sum();

    let bills_subtotal = round2(bills);
    let coins_subtotal = round2(coins);
    let pay_out_subtotal = round2(pay_outs);
    let ath_subtotal = round2(draft.ath_amount);
    let lecture_subtotal = round2(draft.lecture_total);
    let petty_cash_subtotal = round2(draft.petty_cash);

    let net_total = round2(
        bills_subtotal + coins_subtotal + ath_subtotal - pay_out_subtotal - petty_cash_subtotal,
    );

    DerivedTotals {
        bills_subtotal,
        coins_subtotal,
        pay_out_subtotal,
        ath_subtotal,
        lecture_subtotal,
        petty_cash_subtotal,
        net_total,
    }
}
