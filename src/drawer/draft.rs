//! The editable cash drawer draft and the field-by-field update operation.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The number of pay-out slots on the form.
pub const PAY_OUT_SLOTS: usize = 3;

/// A single itemized pay-out from the cash drawer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayOut {
    /// What the money was paid out for.
    pub description: String,
    /// The amount paid out in dollars.
    pub amount: f64,
}

/// The index of one of the fixed pay-out slots.
///
/// Can only be constructed for indices below [PAY_OUT_SLOTS].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PayOutSlot(usize);

impl PayOutSlot {
    /// Create a slot from `index`, or `None` if the form has no such slot.
    pub fn new(index: usize) -> Option<Self> {
        (index < PAY_OUT_SLOTS).then_some(Self(index))
    }

    /// All slots in display order.
    pub fn all() -> impl Iterator<Item = PayOutSlot> {
        (0..PAY_OUT_SLOTS).map(PayOutSlot)
    }

    /// The zero-based slot index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for PayOutSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one editable value on the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The sale date, `saleDate` on the form.
    SaleDate,
    /// The number of $20 bills.
    Bill20,
    /// The number of $10 bills.
    Bill10,
    /// The number of $5 bills.
    Bill5,
    /// The number of $1 bills.
    Bill1,
    /// The number of quarters.
    Coin25,
    /// The number of dimes.
    Coin10,
    /// The number of nickels.
    Coin5,
    /// The number of pennies.
    Coin1,
    /// The description of a pay-out.
    PayOutDescription(PayOutSlot),
    /// The dollar amount of a pay-out.
    PayOutAmount(PayOutSlot),
    /// The ATH payment amount.
    AthAmount,
    /// The ATH payment reference.
    AthReference,
    /// The lecture total.
    LectureTotal,
    /// Cash taken out of the drawer for petty expenses.
    PettyCash,
}

/// The in-progress cash drawer count for one form session.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    /// The sale date as entered, usually `YYYY-MM-DD`.
    pub sale_date: String,
    /// Count of $20 bills.
    pub bill20: f64,
    /// Count of $10 bills.
    pub bill10: f64,
    /// Count of $5 bills.
    pub bill5: f64,
    /// Count of $1 bills.
    pub bill1: f64,
    /// Count of quarters.
    pub coin25: f64,
    /// Count of dimes.
    pub coin10: f64,
    /// Count of nickels.
    pub coin5: f64,
    /// Count of pennies.
    pub coin1: f64,
    /// The pay-out slots in display order, including empty ones.
    pub pay_outs: [PayOut; PAY_OUT_SLOTS],
    /// The amount received through ATH electronic payments.
    pub ath_amount: f64,
    /// Free-text reference for the ATH payment, e.g. a receipt number.
    pub ath_reference: String,
    /// Informational only, never part of the net total.
    pub lecture_total: f64,
    /// Cash taken out of the drawer, deducted from the net total.
    pub petty_cash: f64,
}

impl Draft {
    /// Create a blank draft dated `sale_date`.
    pub fn new(sale_date: impl Into<String>) -> Self {
        Self {
            sale_date: sale_date.into(),
            bill20: 0.0,
            bill10: 0.0,
            bill5: 0.0,
            bill1: 0.0,
            coin25: 0.0,
            coin10: 0.0,
            coin5: 0.0,
            coin1: 0.0,
            pay_outs: Default::default(),
            ath_amount: 0.0,
            ath_reference: String::new(),
            lecture_total: 0.0,
            petty_cash: 0.0,
        }
    }

    /// Set `field` from the raw form input `raw`.
    ///
    /// Text fields keep `raw` as is. Numeric fields go through
    /// [coerce_amount], so input that does not parse becomes zero.
    pub fn apply(&mut self, field: Field, raw: &str) {
        match field {
            Field::SaleDate => self.sale_date = raw.to_owned(),
            Field::AthReference => self.ath_reference = raw.to_owned(),
            Field::PayOutDescription(slot) => {
                self.pay_outs[slot.index()].description = raw.to_owned()
            }
            Field::Bill20 => self.bill20 = coerce_amount(raw),
            Field::Bill10 => self.bill10 = coerce_amount(raw),
            Field::Bill5 => self.bill5 = coerce_amount(raw),
            Field::Bill1 => self.bill1 = coerce_amount(raw),
            Field::Coin25 => self.coin25 = coerce_amount(raw),
            Field::Coin10 => self.coin10 = coerce_amount(raw),
            Field::Coin5 => self.coin5 = coerce_amount(raw),
            Field::Coin1 => self.coin1 = coerce_amount(raw),
            Field::PayOutAmount(slot) => self.pay_outs[slot.index()].amount = coerce_amount(raw),
            Field::AthAmount => self.ath_amount = coerce_amount(raw),
            Field::LectureTotal => self.lecture_total = coerce_amount(raw),
            Field::PettyCash => self.petty_cash = coerce_amount(raw),
        }
    }

    /// The value of `field` as it should be shown in its input.
    pub fn display_value(&self, field: Field) -> String {
        match field {
            Field::SaleDate => self.sale_date.clone(),
            Field::AthReference => self.ath_reference.clone(),
            Field::PayOutDescription(slot) => self.pay_outs[slot.index()].description.clone(),
            Field::Bill20 => self.bill20.to_string(),
            Field::Bill10 => self.bill10.to_string(),
            Field::Bill5 => self.bill5.to_string(),
            Field::Bill1 => self.bill1.to_string(),
            Field::Coin25 => self.coin25.to_string(),
            Field::Coin10 => self.coin10.to_string(),
            Field::Coin5 => self.coin5.to_string(),
            Field::Coin1 => self.coin1.to_string(),
            Field::PayOutAmount(slot) => self.pay_outs[slot.index()].amount.to_string(),
            Field::AthAmount => self.ath_amount.to_string(),
            Field::LectureTotal => self.lecture_total.to_string(),
            Field::PettyCash => self.petty_cash.to_string(),
        }
    }
}

/// Parse a numeric form input, falling back to zero.
///
/// Leading whitespace is skipped and the longest leading decimal number is
/// used, so `"12abc"` is 12 and `""` or `"abc"` are 0. Negative and
/// non-finite results are also 0 since every amount on the form is
/// non-negative.
pub fn coerce_amount(raw: &str) -> f64 {
    let text = raw.trim_start();
    let prefix = &text[..numeric_prefix_len(text)];

    match prefix.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

/// The byte length of the longest prefix of `text` shaped like
/// `[+-]?(digits[.digits]|.digits)([eE][+-]?digits)?`.
fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let integer_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut has_digits = end > integer_start;

    if bytes.get(end) == Some(&b'.') {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while bytes.get(fraction_end).is_some_and(u8::is_ascii_digit) {
            fraction_end += 1;
        }

        if has_digits || fraction_end > fraction_start {
            has_digits = true;
            end = fraction_end;
        }
    }

    if !has_digits {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
            exponent_end += 1;
        }

        let exponent_digits_start = exponent_end;
        while bytes.get(exponent_end).is_some_and(u8::is_ascii_digit) {
            exponent_end += 1;
        }

        if exponent_end > exponent_digits_start {
            end = exponent_end;
        }
    }

    end
}
