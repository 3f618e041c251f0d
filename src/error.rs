//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{alert::Alert, internal_server_error::InternalServerError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The draft failed validation and cannot be submitted.
    ///
    /// Holds the number of validation errors. The errors themselves are kept
    /// on the form session so they can be shown next to their fields.
    #[error("the draft has {0} validation error(s)")]
    InvalidDraft(usize),

    /// A submission for this form session is already in flight.
    ///
    /// The draft cannot be edited, submitted again, or reset until the
    /// submission finishes.
    #[error("a submission is already in progress")]
    SubmissionInProgress,

    /// The draft has been submitted and must be reset before it is edited.
    #[error("the transaction has already been submitted")]
    AlreadySubmitted,

    /// A field edit named a field that is not on the form.
    #[error("unknown form field \"{0}\"")]
    UnknownField(String),

    /// A pay-out field edit did not name one of the pay-out slots.
    #[error("invalid pay-out slot {0:?}")]
    InvalidPayOutSlot(Option<String>),

    /// The submission timestamp could not be formatted.
    #[error("could not format the submission timestamp: {0}")]
    TimestampFormatError(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The task delivering a submission was cancelled before it recorded
    /// the outcome.
    #[error("the submission did not finish")]
    SubmissionInterrupted,

    /// Could not acquire the form session lock
    #[error("could not acquire the form session lock")]
    SessionLockError,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::SessionLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::SubmissionInProgress => (
                StatusCode::CONFLICT,
                Alert::Error {
                    message: "Submission in progress".to_owned(),
                    details: "The transaction is still being submitted. \
                    Wait for it to finish before making changes."
                        .to_owned(),
                },
            ),
            Error::AlreadySubmitted => (
                StatusCode::CONFLICT,
                Alert::Error {
                    message: "Transaction already submitted".to_owned(),
                    details: "Start a new transaction to record another count.".to_owned(),
                },
            ),
            Error::UnknownField(name) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Unknown field".to_owned(),
                    details: format!("The form has no field called \"{name}\"."),
                },
            ),
            Error::InvalidPayOutSlot(index) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid pay out".to_owned(),
                    details: match index {
                        Some(index) => format!("There is no pay out slot \"{index}\"."),
                        None => "The pay out number is missing.".to_owned(),
                    },
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}
