//! Checks a draft before it may be submitted.

use std::{collections::BTreeMap, fmt::Display};

use crate::drawer::draft::{Draft, Field, PayOutSlot};

pub const DATE_REQUIRED_MSG: &str = "Date is required";
pub const NO_AMOUNT_MSG: &str = "At least one bill, coin, or ATH amount must be entered";
pub const PAY_OUT_DESCRIPTION_REQUIRED_MSG: &str = "Description is required when amount is entered";

/// Where a validation error is shown on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKey {
    /// The sale date is missing.
    SaleDate,
    /// Errors about the form as a whole.
    General,
    /// A pay-out has an amount but no description.
    PayOutDescription(PayOutSlot),
}

impl ErrorKey {
    /// The key that edits to `field` clear, if any.
    pub fn for_field(field: Field) -> Option<ErrorKey> {
        match field {
            Field::SaleDate => Some(ErrorKey::SaleDate),
            Field::PayOutDescription(slot) => Some(ErrorKey::PayOutDescription(slot)),
            _ => None,
        }
    }

    /// An HTML element ID for the element that displays this error.
    pub fn element_id(self) -> String {
        match self {
            ErrorKey::SaleDate => "error-saleDate".to_owned(),
            ErrorKey::General => "error-general".to_owned(),
            ErrorKey::PayOutDescription(slot) => format!("error-payOutDesc-{slot}"),
        }
    }
}

impl Display for ErrorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKey::SaleDate => write!(f, "saleDate"),
            ErrorKey::General => write!(f, "general"),
            ErrorKey::PayOutDescription(slot) => write!(f, "payOutDesc[{slot}]"),
        }
    }
}

/// Error messages keyed by where they belong on the form.
///
/// A key that is absent means that part of the form is valid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors(BTreeMap<ErrorKey, String>);

impl ValidationErrors {
    /// Whether the draft passed every rule.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The number of failed rules.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The message shown for `key`, if that part of the form is invalid.
    pub fn get(&self, key: ErrorKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    /// Set the message for `key`, replacing any earlier one.
    pub fn insert(&mut self, key: ErrorKey, message: impl Into<String>) {
        self.0.insert(key, message.into());
    }

    /// Remove the error for `key`, returning whether there was one.
    pub fn clear(&mut self, key: ErrorKey) -> bool {
        self.0.remove(&key).is_some()
    }

    /// Every error in key order.
    pub fn iter(&self) -> impl Iterator<Item = (ErrorKey, &str)> {
        self.0.iter().map(|(key, message)| (*key, message.as_str()))
    }
}

/// Check `draft` against every rule and collect the failures.
///
/// The rules are independent, so a draft can fail several at once.
pub fn validate(draft: &Draft) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if draft.sale_date.is_empty() {
        errors.insert(ErrorKey::SaleDate, DATE_REQUIRED_MSG);
    }

    let has_value = [
        draft.bill20,
        draft.bill10,
        draft.bill5,
        draft.bill1,
        draft.coin25,
        draft.coin10,
        draft.coin5,
        draft.coin1,
        draft.ath_amount,
    ]
    .iter()
    .any(|amount| *amount > 0.0);

    if !has_value {
        errors.insert(ErrorKey::General, NO_AMOUNT_MSG);
    }

    for slot in PayOutSlot::all() {
        let pay_out = &draft.pay_outs[slot.index()];

        if pay_out.amount > 0.0 && pay_out.description.trim().is_empty() {
            errors.insert(
                ErrorKey::PayOutDescription(slot),
                PAY_OUT_DESCRIPTION_REQUIRED_MSG,
            );
        }
    }

    errors
}
