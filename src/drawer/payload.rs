//! The JSON document sent to the transaction recording endpoint.

use serde::{Deserialize, Serialize};

use crate::drawer::{
    draft::{Draft, PayOut},
    totals::DerivedTotals,
};

/// Bill counts and their subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillCounts {
    /// Count of $20 bills.
    pub twenties: f64,
    /// Count of $10 bills.
    pub tens: f64,
    /// Count of $5 bills.
    pub fives: f64,
    /// Count of $1 bills.
    pub ones: f64,
    /// The dollar value of all bills.
    pub subtotal: f64,
}

/// Coin counts and their subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinCounts {
    /// Count of quarters.
    pub quarters: f64,
    /// Count of dimes.
    pub dimes: f64,
    /// Count of nickels.
    pub nickels: f64,
    /// Count of pennies.
    pub pennies: f64,
    /// The dollar value of all coins.
    pub subtotal: f64,
}

/// The ATH electronic payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthPayment {
    /// The amount as entered.
    pub amount: f64,
    /// The payment reference as entered.
    pub reference: String,
    /// The amount rounded to cents.
    pub subtotal: f64,
}

/// A completed cash drawer count, ready to be posted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    /// The sale date of the count.
    pub transaction_date: String,
    /// Bill counts and their subtotal.
    pub bills: BillCounts,
    /// Coin counts and their subtotal.
    pub coins: CoinCounts,
    /// Only the pay-outs with both an amount and a description.
    pub pay_outs: Vec<PayOut>,
    /// The sum of all pay-out amounts.
    pub pay_out_subtotal: f64,
    /// The ATH electronic payment.
    pub ath: AthPayment,
    /// The lecture total, for reference only.
    pub lecture_total: f64,
    /// Cash taken out for petty expenses.
    pub petty_cash: f64,
    /// Bills, coins and ATH minus pay-outs and petty cash.
    pub net_total: f64,
    /// RFC 3339 time at which the submission was made.
    pub timestamp: String,
}

impl SubmissionPayload {
    /// Normalize `draft` and its `totals` into a payload stamped with `timestamp`.
    pub fn new(draft: &Draft, totals: &DerivedTotals, timestamp: String) -> Self {
        let pay_outs = draft
            .pay_outs
            .iter()
            .filter(|pay_out| pay_out.amount > 0.0 && !pay_out.description.trim().is_empty())
            .cloned()
            .collect();

        Self {
            transaction_date: draft.sale_date.clone(),
            bills: BillCounts {
                twenties: draft.bill20,
                tens: draft.bill10,
                fives: draft.bill5,
                ones: draft.bill1,
                subtotal: totals.bills_subtotal,
            },
            coins: CoinCounts {
                quarters: draft.coin25,
                dimes: draft.coin10,
                nickels: draft.coin5,
                pennies: draft.coin1,
                subtotal: totals.coins_subtotal,
            },
            pay_outs,
            pay_out_subtotal: totals.pay_out_subtotal,
            ath: AthPayment {
                amount: draft.ath_amount,
                reference: draft.ath_reference.clone(),
                subtotal: totals.ath_subtotal,
            },
            lecture_total: draft.lecture_total,
            petty_cash: draft.petty_cash,
            net_total: totals.net_total,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use crate::drawer::{
        draft::{Draft, Field, PayOut, PayOutSlot},
        totals::derive_totals,
    };

    use super::SubmissionPayload;

    const TIMESTAMP: &str = "2025-03-01T17:30:00-04:00";

    fn slot(index: usize) -> PayOutSlot {
        PayOutSlot::new(index).unwrap()
    }

    fn sample_draft() -> Draft {
        let mut draft = Draft::new("2025-03-01");
        draft.apply(Field::Bill20, "4");
        draft.apply(Field::Bill1, "3");
        draft.apply(Field::Coin25, "7");
        draft.apply(Field::Coin1, "13");
        draft.apply(Field::PayOutDescription(slot(0)), "Ice delivery");
        draft.apply(Field::PayOutAmount(slot(0)), "12.35");
        draft.apply(Field::PayOutAmount(slot(1)), "4");
        draft.apply(Field::PayOutDescription(slot(2)), "No amount");
        draft.apply(Field::AthAmount, "61.1");
        draft.apply(Field::AthReference, "R-881");
        draft.apply(Field::LectureTotal, "140");
        draft.apply(Field::PettyCash, "5.5");
        draft
    }

    #[test]
    fn payload_has_the_expected_shape() {
        let draft = sample_draft();
        let totals = derive_totals(&draft);

        let payload = SubmissionPayload::new(&draft, &totals, TIMESTAMP.to_owned());
        let got = serde_json::to_value(&payload).unwrap();

        let want = json!({
            "transactionDate": "2025-03-01",
            "bills": { "twenties": 4.0, "tens": 0.0, "fives": 0.0, "ones": 3.0, "subtotal": 83.0 },
            "coins": { "quarters": 7.0, "dimes": 0.0, "nickels": 0.0, "pennies": 13.0, "subtotal": 1.88 },
            "payOuts": [ { "description": "Ice delivery", "amount": 12.35 } ],
            "payOutSubtotal": 16.35,
            "ath": { "amount": 61.1, "reference": "R-881", "subtotal": 61.1 },
            "lectureTotal": 140.0,
            "pettyCash": 5.5,
            "netTotal": 124.13,
            "timestamp": TIMESTAMP,
        });

        assert_eq!(got, want);
    }

    #[test]
    fn pay_outs_need_amount_and_description() {
        let draft = sample_draft();
        let totals = derive_totals(&draft);

        let payload = SubmissionPayload::new(&draft, &totals, TIMESTAMP.to_owned());

        assert_eq!(
            payload.pay_outs,
            vec![PayOut {
                description: "Ice delivery".to_owned(),
                amount: 12.35
            }]
        );
        // The subtotal still covers every slot.
        assert_eq!(payload.pay_out_subtotal, 16.35);
    }

    #[test]
    fn numbers_survive_a_json_echo() {
        let draft = sample_draft();
        let totals = derive_totals(&draft);
        let payload = SubmissionPayload::new(&draft, &totals, TIMESTAMP.to_owned());

        let echoed = serde_json::to_string(&payload).unwrap();
        let echoed: SubmissionPayload = serde_json::from_str(&echoed).unwrap();

        assert_eq!(echoed, payload);
        assert_eq!(echoed.net_total, totals.net_total);
        assert_eq!(echoed.coins.subtotal, totals.coins_subtotal);
        assert_eq!(echoed.ath.amount, draft.ath_amount);
    }

    #[test]
    fn field_names_are_camel_case() {
        let draft = sample_draft();
        let payload = SubmissionPayload::new(&draft, &derive_totals(&draft), TIMESTAMP.to_owned());

        let value = serde_json::to_value(&payload).unwrap();
        let Value::Object(fields) = value else {
            panic!("payload should serialize to an object");
        };

        let mut keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "ath",
                "bills",
                "coins",
                "lectureTotal",
                "netTotal",
                "payOutSubtotal",
                "payOuts",
                "pettyCash",
                "timestamp",
                "transactionDate",
            ]
        );
    }
}
