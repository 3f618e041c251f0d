//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    drawer::{
        dismiss_submission_error_endpoint, edit_field_endpoint, get_form_page,
        reset_draft_endpoint, submit_transaction_endpoint,
    },
    endpoints,
    identity::{get_sign_out, identity_guard, identity_guard_hx},
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let identity = state.identity.clone();

    let unprotected_routes = Router::new()
        .route(endpoints::SIGN_OUT, get(get_sign_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::FORM_VIEW, get(get_form_page))
        .layer(middleware::from_fn_with_state(
            identity.clone(),
            identity_guard,
        ));

    // These POST routes need to use the HX-REDIRECT header for sign-in redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::DRAFT_FIELD, post(edit_field_endpoint))
            .route(endpoints::SUBMIT, post(submit_transaction_endpoint))
            .route(endpoints::RESET, post(reset_draft_endpoint))
            .route(
                endpoints::DISMISS_ERROR,
                post(dismiss_submission_error_endpoint),
            )
            .layer(middleware::from_fn_with_state(identity, identity_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}
