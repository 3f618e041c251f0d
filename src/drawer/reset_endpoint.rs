//! Defines the endpoints for starting a new transaction and hiding the submission error.

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    drawer::form_page::{DrawerState, submission_banner},
    endpoints,
    identity::CurrentUser,
    timezone::local_today,
};

/// A route handler that replaces the user's draft with a blank one dated today.
///
/// Refused while a submission is in flight.
pub async fn reset_draft_endpoint(
    State(state): State<DrawerState>,
    Extension(user): Extension<CurrentUser>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let result = state
        .sessions
        .with_session(user.name(), || today.clone(), |session| {
            session.reset(today.clone())
        })
        .and_then(|result| result);

    match result {
        Ok(()) => {
            tracing::info!("Started a new transaction for {}", user.name());
            (
                HxRedirect(endpoints::FORM_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::warn!("Could not reset the draft for {}: {error}", user.name());
            error.into_alert_response()
        }
    }
}

/// A route handler that hides the banner from a failed submission.
pub async fn dismiss_submission_error_endpoint(
    State(state): State<DrawerState>,
    Extension(user): Extension<CurrentUser>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    match state
        .sessions
        .with_session(user.name(), || today, |session| {
            session.dismiss_submission_error()
        }) {
        Ok(()) => submission_banner(None).into_response(),
        Err(error) => error.into_alert_response(),
    }
}

#[cfg(test)]
mod tests {
    use axum::{Extension, extract::State, http::StatusCode};
    use axum_htmx::HX_REDIRECT;

    use crate::{
        drawer::{
            draft::Field,
            form_page::DrawerState,
            reset_endpoint::{dismiss_submission_error_endpoint, reset_draft_endpoint},
            session::{FormSession, FormState},
            transport::TransportError,
        },
        endpoints,
        test_utils::{assert_status_ok, parse_html_fragment, test_user},
        timezone::local_today,
    };

    fn get_state() -> DrawerState {
        DrawerState {
            sessions: Default::default(),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn snapshot(state: &DrawerState) -> FormSession {
        state
            .sessions
            .with_session(test_user().name(), String::new, |session| session.clone())
            .unwrap()
    }

    #[tokio::test]
    async fn reset_after_submission_starts_fresh() {
        let state = get_state();
        state
            .sessions
            .with_session(test_user().name(), || "2024-12-31".to_owned(), |session| {
                session.edit(Field::Bill5, "3").unwrap();
                session.edit(Field::PettyCash, "8").unwrap();
                session
                    .begin_submission("2024-12-31T23:00:00Z".to_owned())
                    .unwrap();
                session.finish_submission(Ok(r#"{"transactionId":"t-9"}"#.to_owned()));
            })
            .unwrap();

        let response = reset_draft_endpoint(State(state.clone()), Extension(test_user())).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            endpoints::FORM_VIEW
        );

        let session = snapshot(&state);
        let today = local_today("Etc/UTC").unwrap();
        assert_eq!(session.state(), FormState::Editing);
        assert_eq!(session.draft(), FormSession::new(today).draft());
        assert_eq!(session.totals().net_total, 0.0);
        assert!(session.result().is_none());
    }

    #[tokio::test]
    async fn reset_while_submitting_is_conflict() {
        let state = get_state();
        state
            .sessions
            .with_session(test_user().name(), || "2025-03-01".to_owned(), |session| {
                session.edit(Field::Bill5, "3").unwrap();
                session
                    .begin_submission("2025-03-01T00:00:00Z".to_owned())
                    .unwrap();
            })
            .unwrap();

        let response = reset_draft_endpoint(State(state.clone()), Extension(test_user())).await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(snapshot(&state).draft().bill5, 3.0);
    }

    #[tokio::test]
    async fn dismiss_clears_banner_and_keeps_draft() {
        let state = get_state();
        state
            .sessions
            .with_session(test_user().name(), || "2025-03-01".to_owned(), |session| {
                session.edit(Field::Coin10, "4").unwrap();
                session
                    .begin_submission("2025-03-01T00:00:00Z".to_owned())
                    .unwrap();
                session.finish_submission(Err(TransportError::Status(503)));
            })
            .unwrap();

        let response =
            dismiss_submission_error_endpoint(State(state.clone()), Extension(test_user())).await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        let banner = html
            .select(&scraper::Selector::parse("#submission-error").unwrap())
            .next()
            .expect("banner placeholder missing");
        assert_eq!(banner.text().collect::<String>().trim(), "");

        let session = snapshot(&state);
        assert_eq!(session.submission_error(), None);
        assert_eq!(session.draft().coin10, 4.0);
    }
}
