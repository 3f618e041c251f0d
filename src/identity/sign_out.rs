//! Sign-out route handler that hands the user back to the identity provider.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};

use crate::identity::IdentityConfig;

/// Redirect the client to the identity provider's sign-out page.
pub async fn get_sign_out(State(config): State<IdentityConfig>) -> Response {
    Redirect::to(&config.sign_out_url).into_response()
}
