//! The API endpoints URIs.

/// The cash drawer form, or the confirmation once the transaction is submitted.
pub const FORM_VIEW: &str = "/";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for updating a single field of the draft.
pub const DRAFT_FIELD: &str = "/api/draft/field";
/// The route for submitting the draft as a transaction.
pub const SUBMIT: &str = "/api/draft/submit";
/// The route for discarding the draft and starting a new transaction.
pub const RESET: &str = "/api/draft/reset";
/// The route for hiding the banner shown after a failed submission.
pub const DISMISS_ERROR: &str = "/api/draft/dismiss_error";
/// The route that hands the user over to the identity provider to sign out.
pub const SIGN_OUT: &str = "/sign_out";
