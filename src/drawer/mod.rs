//! The cash drawer form: the draft, its totals and validation, and the
//! submission of a completed count.

mod confirmation;
mod draft;
mod edit_endpoint;
mod form_page;
mod payload;
mod reset_endpoint;
mod response;
mod session;
mod submit_endpoint;
mod totals;
mod transport;
mod validation;

pub use draft::{Draft, Field, PAY_OUT_SLOTS, PayOut, PayOutSlot, coerce_amount};
pub use edit_endpoint::edit_field_endpoint;
pub use form_page::get_form_page;
pub use payload::SubmissionPayload;
pub use reset_endpoint::{dismiss_submission_error_endpoint, reset_draft_endpoint};
pub use response::{ResponseError, SubmissionResult, parse_submission_response};
pub use session::{FormSession, FormSessions, FormState};
pub use submit_endpoint::submit_transaction_endpoint;
pub use totals::{DerivedTotals, derive_totals, round2};
pub use transport::{HttpTransport, Transport, TransportError};
pub use validation::{ErrorKey, ValidationErrors, validate};
