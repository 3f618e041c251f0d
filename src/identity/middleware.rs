//! Middleware that requires a signed-in user and redirects to the sign-in page otherwise.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;

use crate::identity::{CurrentUser, IdentityConfig};

#[inline]
async fn identity_guard_internal(
    config: IdentityConfig,
    mut request: Request,
    next: Next,
    get_redirect: impl Fn(&str) -> Response,
) -> Response {
    let user = request
        .headers()
        .get(config.user_header.as_str())
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(CurrentUser::new);

    let Some(user) = user else {
        tracing::warn!(
            "Request to {} has no {} header. Redirecting to sign in.",
            request.uri().path(),
            config.user_header
        );
        return get_redirect(&config.sign_in_url);
    };

    request.extensions_mut().insert(user);

    next.run(request).await
}

/// Middleware function that checks for the user header.
/// The [CurrentUser] is placed into the request and the request executed
/// normally if the header is present, otherwise a redirect to the sign-in
/// page is returned.
pub async fn identity_guard(
    State(config): State<IdentityConfig>,
    request: Request,
    next: Next,
) -> Response {
    identity_guard_internal(config, request, next, |redirect_url| {
        Redirect::to(redirect_url).into_response()
    })
    .await
}

/// Middleware function that checks for the user header.
/// The [CurrentUser] is placed into the request and the request executed
/// normally if the header is present, otherwise a HTMX redirect to the
/// sign-in page is returned.
pub async fn identity_guard_hx(
    State(config): State<IdentityConfig>,
    request: Request,
    next: Next,
) -> Response {
    identity_guard_internal(config, request, next, |redirect_url| {
        (HxRedirect(redirect_url.to_owned()), StatusCode::OK).into_response()
    })
    .await
}
