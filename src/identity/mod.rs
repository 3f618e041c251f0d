//! Identifies the signed-in user from the header set by the authenticating proxy.

mod middleware;
mod sign_out;

pub use middleware::{identity_guard, identity_guard_hx};
pub use sign_out::get_sign_out;

use axum::extract::FromRef;

use crate::AppState;

/// The header that carries the signed-in user's name unless configured otherwise.
pub const DEFAULT_USER_HEADER: &str = "x-forwarded-user";

/// Where to find the signed-in user and where to send them to sign in or out.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityConfig {
    /// The request header holding the user name, e.g. "x-forwarded-user".
    pub user_header: String,
    /// Where requests without a user are redirected.
    pub sign_in_url: String,
    /// Where the "Sign out" link sends the user.
    pub sign_out_url: String,
}

impl FromRef<AppState> for IdentityConfig {
    fn from_ref(state: &AppState) -> Self {
        state.identity.clone()
    }
}

/// The signed-in user, placed in the request extensions by [identity_guard].
///
/// Route handlers can use the function argument
/// `Extension(user): Extension<CurrentUser>` to receive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(String);

impl CurrentUser {
    /// Wrap the user name taken from the identity header.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The user name as reported by the identity provider.
    pub fn name(&self) -> &str {
        &self.0
    }
}
