//! The per-user form session and its submission state machine.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::{
    Error,
    drawer::{
        draft::{Draft, Field},
        payload::SubmissionPayload,
        response::{SubmissionResult, parse_submission_response},
        totals::{DerivedTotals, derive_totals},
        transport::TransportError,
        validation::{ErrorKey, ValidationErrors, validate},
    },
};

/// Where a form session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    /// The draft can be edited and submitted.
    Editing,
    /// A submission is in flight. Edits and further submissions are refused.
    Submitting,
    /// The transaction was recorded and the confirmation is showing.
    Submitted,
}

/// One user's draft, its derived totals and everything shown around it.
#[derive(Debug, Clone)]
pub struct FormSession {
    draft: Draft,
    totals: DerivedTotals,
    errors: ValidationErrors,
    state: FormState,
    submission_error: Option<String>,
    result: Option<SubmissionResult>,
}

impl FormSession {
    /// Start a session with a blank draft dated `today`.
    pub fn new(today: impl Into<String>) -> Self {
        let draft = Draft::new(today);
        let totals = derive_totals(&draft);

        Self {
            draft,
            totals,
            errors: ValidationErrors::default(),
            state: FormState::Editing,
            submission_error: None,
            result: None,
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn totals(&self) -> &DerivedTotals {
        &self.totals
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// The banner message from the last failed submission.
    pub fn submission_error(&self) -> Option<&str> {
        self.submission_error.as_deref()
    }

    /// The result of the last successful submission.
    pub fn result(&self) -> Option<&SubmissionResult> {
        self.result.as_ref()
    }

    /// Set `field` from the raw input `raw`, re-derive the totals, and clear
    /// the validation error shown for that field.
    ///
    /// Returns the error key that was cleared, if there was one.
    ///
    /// # Errors
    /// Returns an error if the session is not in [FormState::Editing].
    pub fn edit(&mut self, field: Field, raw: &str) -> Result<Option<ErrorKey>, Error> {
        self.ensure_editing()?;

        self.draft.apply(field, raw);
        self.totals = derive_totals(&self.draft);

        Ok(ErrorKey::for_field(field).filter(|key| self.errors.clear(*key)))
    }

    /// Validate the draft and, if it passes, move to [FormState::Submitting].
    ///
    /// On success the payload to send is returned. On a validation failure
    /// the errors are kept for display and the session stays editable.
    ///
    /// # Errors
    /// Returns [Error::InvalidDraft] if validation fails, or an error if the
    /// session is not in [FormState::Editing].
    pub fn begin_submission(&mut self, timestamp: String) -> Result<SubmissionPayload, Error> {
        self.ensure_editing()?;

        let errors = validate(&self.draft);
        if !errors.is_empty() {
            let error_count = errors.len();
            self.errors = errors;
            return Err(Error::InvalidDraft(error_count));
        }

        self.errors = ValidationErrors::default();
        self.submission_error = None;
        self.state = FormState::Submitting;

        Ok(SubmissionPayload::new(&self.draft, &self.totals, timestamp))
    }

    /// Record the outcome of the network call started by [Self::begin_submission].
    ///
    /// A readable response moves the session to [FormState::Submitted]. A
    /// transport failure or unreadable response puts the session back into
    /// [FormState::Editing] with a banner message and the draft untouched.
    pub fn finish_submission(&mut self, outcome: Result<String, TransportError>) {
        if self.state != FormState::Submitting {
            tracing::warn!(
                "Ignoring submission outcome for a session in state {:?}",
                self.state
            );
            return;
        }

        let parsed = outcome
            .map_err(|error| error.to_string())
            .and_then(|raw| parse_submission_response(&raw).map_err(|error| error.to_string()));

        match parsed {
            Ok(result) => {
                tracing::info!(
                    "Recorded cash drawer transaction {:?} for {}",
                    result.transaction_id,
                    self.draft.sale_date
                );
                self.result = Some(result);
                self.state = FormState::Submitted;
            }
            Err(message) => {
                tracing::error!("Error submitting transaction: {message}");
                self.submission_error = Some(message);
                self.state = FormState::Editing;
            }
        }
    }

    /// Start over with a blank draft dated `today`.
    ///
    /// # Errors
    /// Returns an error if a submission is in flight.
    pub fn reset(&mut self, today: impl Into<String>) -> Result<(), Error> {
        if self.state == FormState::Submitting {
            return Err(Error::SubmissionInProgress);
        }

        *self = Self::new(today);

        Ok(())
    }

    /// Hide the banner from a failed submission.
    pub fn dismiss_submission_error(&mut self) {
        self.submission_error = None;
    }

    fn ensure_editing(&self) -> Result<(), Error> {
        match self.state {
            FormState::Editing => Ok(()),
            FormState::Submitting => Err(Error::SubmissionInProgress),
            FormState::Submitted => Err(Error::AlreadySubmitted),
        }
    }
}

/// The form sessions of every signed-in user, keyed by user name.
#[derive(Debug, Clone, Default)]
pub struct FormSessions {
    sessions: Arc<Mutex<HashMap<String, FormSession>>>,
}

impl FormSessions {
    /// Run `f` on the session for `user`, creating a fresh one dated
    /// `today()` if the user has none yet.
    ///
    /// The lock is released when `f` returns, so `f` must not wait on I/O.
    ///
    /// # Errors
    /// Returns an error if the session lock is poisoned.
    pub fn with_session<T>(
        &self,
        user: &str,
        today: impl FnOnce() -> String,
        f: impl FnOnce(&mut FormSession) -> T,
    ) -> Result<T, Error> {
        let mut sessions = self
            .sessions
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire session lock: {error}"))
            .map_err(|_| Error::SessionLockError)?;

        let session = sessions
            .entry(user.to_owned())
            .or_insert_with(|| FormSession::new(today()));

        Ok(f(session))
    }
}
