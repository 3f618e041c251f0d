//! Implements a struct that holds the state of the web server.

use std::sync::Arc;

use crate::{
    Error,
    drawer::{FormSessions, Transport},
    identity::IdentityConfig,
    timezone::get_local_offset,
};

/// Where completed transactions are sent.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionConfig {
    /// The URL that submission payloads are POSTed to.
    pub endpoint_url: String,
}

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// How the signed-in user is identified.
    pub identity: IdentityConfig,

    /// Where completed transactions are sent.
    pub submission: SubmissionConfig,

    /// Sends completed transactions to [SubmissionConfig::endpoint_url].
    pub transport: Arc<dyn Transport>,

    /// The local timezone as a canonical timezone name, e.g. "America/Puerto_Rico".
    pub local_timezone: String,

    /// The in-progress form of every user.
    pub sessions: FormSessions,
}

impl AppState {
    /// Create a new [AppState] with no form sessions.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "America/Puerto_Rico".
    ///
    /// # Errors
    /// Returns an error if `local_timezone` is not a known timezone.
    pub fn new(
        identity: IdentityConfig,
        submission: SubmissionConfig,
        transport: Arc<dyn Transport>,
        local_timezone: &str,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        Ok(Self {
            identity,
            submission,
            transport,
            local_timezone: local_timezone.to_owned(),
            sessions: FormSessions::default(),
        })
    }
}
