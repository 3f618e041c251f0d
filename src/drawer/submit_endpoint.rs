//! Defines the endpoint for submitting the draft as a transaction.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    AppState, Error, endpoints,
    drawer::{
        form_page::drawer_form,
        payload::SubmissionPayload,
        session::{FormSession, FormSessions, FormState},
        transport::{Transport, TransportError},
    },
    identity::CurrentUser,
    timezone::{local_timestamp, local_today},
};

/// The state needed to submit a transaction.
#[derive(Debug, Clone)]
pub struct SubmitState {
    /// The form session of every user.
    pub sessions: FormSessions,
    /// The local timezone as a canonical timezone name, e.g. "America/Puerto_Rico".
    pub local_timezone: String,
    /// Sends the payload to the recording endpoint.
    pub transport: Arc<dyn Transport>,
    /// The URL of the recording endpoint.
    pub endpoint_url: String,
}

impl FromRef<AppState> for SubmitState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            sessions: state.sessions.clone(),
            local_timezone: state.local_timezone.clone(),
            transport: state.transport.clone(),
            endpoint_url: state.submission.endpoint_url.clone(),
        }
    }
}

/// A route handler for submitting the user's draft.
///
/// Redirects to the form page, which shows the confirmation, if the
/// transaction was recorded. Otherwise the form is rendered again with the
/// validation errors or the submission error banner.
pub async fn submit_transaction_endpoint(
    State(state): State<SubmitState>,
    Extension(user): Extension<CurrentUser>,
) -> Response {
    let (today, timestamp) = match local_today(&state.local_timezone)
        .and_then(|today| Ok((today, local_timestamp(&state.local_timezone)?)))
    {
        Ok(times) => times,
        Err(error) => return error.into_alert_response(),
    };

    let begun = state
        .sessions
        .with_session(user.name(), || today.clone(), |session| {
            (session.begin_submission(timestamp), session.clone())
        });

    let (begun, snapshot) = match begun {
        Ok(begun) => begun,
        Err(error) => return error.into_alert_response(),
    };

    let payload = match begun {
        Ok(payload) => payload,
        Err(Error::InvalidDraft(error_count)) => {
            tracing::info!(
                "Blocked submission for {} with {error_count} validation error(s)",
                user.name()
            );
            return drawer_form(&snapshot).into_response();
        }
        Err(error) => {
            tracing::warn!("Refused submission for {}: {error}", user.name());
            return error.into_alert_response();
        }
    };

    // The delivery runs as its own task so the session leaves Submitting even
    // if this request is dropped before the endpoint answers.
    let submission = tokio::spawn(deliver_and_record(
        state.sessions.clone(),
        state.transport.clone(),
        state.endpoint_url.clone(),
        user.name().to_owned(),
        today,
        payload,
    ));

    let finished = match submission.await {
        Ok(finished) => finished,
        Err(error) => {
            tracing::error!("Submission for {} did not finish: {error}", user.name());
            Err(Error::SubmissionInterrupted)
        }
    };

    match finished {
        Ok(session) if session.state() == FormState::Submitted => (
            HxRedirect(endpoints::FORM_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Ok(session) => drawer_form(&session).into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Post `payload` and record the outcome on the user's session.
///
/// The session lock is not held while waiting on the network.
async fn deliver_and_record(
    sessions: FormSessions,
    transport: Arc<dyn Transport>,
    endpoint_url: String,
    user: String,
    today: String,
    payload: SubmissionPayload,
) -> Result<FormSession, Error> {
    let outcome = deliver(transport, endpoint_url, &user, payload).await;

    sessions.with_session(&user, || today, |session| {
        session.finish_submission(outcome);
        session.clone()
    })
}

async fn deliver(
    transport: Arc<dyn Transport>,
    endpoint_url: String,
    user: &str,
    payload: SubmissionPayload,
) -> Result<String, TransportError> {
    let body = serde_json::to_string(&payload)
        .map_err(|error| TransportError::Encoding(error.to_string()))?;
    tracing::debug!("Submitting transaction for {user}: {body}");

    // A panic in the transport must still produce an outcome for the session.
    tokio::spawn(async move { transport.post_json(&endpoint_url, body).await })
        .await
        .unwrap_or_else(|error| {
            tracing::error!("Transport for {user} stopped without a response: {error}");
            Err(TransportError::Interrupted)
        })
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use async_trait::async_trait;
    use axum::{Extension, extract::State, http::StatusCode};
    use axum_htmx::HX_REDIRECT;
    use scraper::Selector;
    use serde_json::Value;

    use crate::{
        drawer::{
            draft::Field,
            session::{FormSessions, FormState},
            submit_endpoint::{SubmitState, submit_transaction_endpoint},
            transport::{Transport, TransportError},
            validation::NO_AMOUNT_MSG,
        },
        endpoints,
        test_utils::{FakeTransport, assert_status_ok, parse_html_fragment, test_user},
    };

    const ENDPOINT_URL: &str = "https://records.example.com/transactions";

    fn get_state(transport: Arc<FakeTransport>) -> SubmitState {
        SubmitState {
            sessions: FormSessions::default(),
            local_timezone: "Etc/UTC".to_owned(),
            transport,
            endpoint_url: ENDPOINT_URL.to_owned(),
        }
    }

    fn fill_valid_draft(sessions: &FormSessions) {
        sessions
            .with_session(test_user().name(), || "2025-03-01".to_owned(), |session| {
                session.edit(Field::Bill20, "1").unwrap();
                session.edit(Field::Coin25, "2").unwrap();
            })
            .unwrap();
    }

    fn session_state(sessions: &FormSessions) -> FormState {
        sessions
            .with_session(test_user().name(), String::new, |session| session.state())
            .unwrap()
    }

    #[tokio::test]
    async fn valid_draft_is_posted_and_redirects() {
        let transport = Arc::new(FakeTransport::responding(
            r#"{"body":"{\"transactionId\":\"abc123\"}"}"#,
        ));
        let state = get_state(transport.clone());
        fill_valid_draft(&state.sessions);

        let response =
            submit_transaction_endpoint(State(state.clone()), Extension(test_user())).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            endpoints::FORM_VIEW
        );
        assert_eq!(session_state(&state.sessions), FormState::Submitted);

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        let (url, body) = &requests[0];
        assert_eq!(url, ENDPOINT_URL);
        let body: Value = serde_json::from_str(body).unwrap();
        assert_eq!(body["transactionDate"], "2025-03-01");
        assert_eq!(body["netTotal"], 20.5);
        assert_eq!(body["bills"]["subtotal"], 20.0);
        assert_eq!(body["coins"]["subtotal"], 0.5);
    }

    #[tokio::test]
    async fn invalid_draft_renders_errors_without_posting() {
        let transport = Arc::new(FakeTransport::responding("{}"));
        let state = get_state(transport.clone());

        let response =
            submit_transaction_endpoint(State(state.clone()), Extension(test_user())).await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        let general = html
            .select(&Selector::parse("#error-general").unwrap())
            .next()
            .expect("general error missing")
            .text()
            .collect::<String>();
        assert_eq!(general.trim(), NO_AMOUNT_MSG);
        assert!(transport.requests().is_empty());
        assert_eq!(session_state(&state.sessions), FormState::Editing);
    }

    #[tokio::test]
    async fn transport_failure_renders_banner_and_keeps_draft() {
        let transport = Arc::new(FakeTransport::failing(TransportError::Network(
            "connection refused".to_owned(),
        )));
        let state = get_state(transport);
        fill_valid_draft(&state.sessions);

        let response =
            submit_transaction_endpoint(State(state.clone()), Extension(test_user())).await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        let banner = html
            .select(&Selector::parse("#submission-error").unwrap())
            .next()
            .expect("banner missing")
            .text()
            .collect::<String>();
        assert!(
            banner.contains("Could not reach the server: connection refused"),
            "got banner {banner:?}"
        );
        assert_eq!(session_state(&state.sessions), FormState::Editing);
        let bill20 = state
            .sessions
            .with_session(test_user().name(), String::new, |session| {
                session.draft().bill20
            })
            .unwrap();
        assert_eq!(bill20, 1.0);
    }

    #[tokio::test]
    async fn unreadable_response_renders_banner() {
        let transport = Arc::new(FakeTransport::responding("<html>Bad Gateway</html>"));
        let state = get_state(transport);
        fill_valid_draft(&state.sessions);

        let response =
            submit_transaction_endpoint(State(state.clone()), Extension(test_user())).await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        let banner = html
            .select(&Selector::parse("#submission-error").unwrap())
            .next()
            .expect("banner missing")
            .text()
            .collect::<String>();
        assert!(
            banner.contains("Invalid response format from server"),
            "got banner {banner:?}"
        );
    }

    #[tokio::test]
    async fn submit_while_submitting_is_conflict() {
        let transport = Arc::new(FakeTransport::responding("{}"));
        let state = get_state(transport.clone());
        fill_valid_draft(&state.sessions);
        state
            .sessions
            .with_session(test_user().name(), String::new, |session| {
                session
                    .begin_submission("2025-03-01T00:00:00Z".to_owned())
                    .unwrap();
            })
            .unwrap();

        let response =
            submit_transaction_endpoint(State(state.clone()), Extension(test_user())).await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(transport.requests().is_empty());
        assert_eq!(session_state(&state.sessions), FormState::Submitting);
    }

    #[tokio::test]
    async fn dropped_request_still_finishes_submission() {
        let transport = Arc::new(
            FakeTransport::responding(r#"{"transactionId":"late-1"}"#)
                .after(Duration::from_millis(200)),
        );
        let state = get_state(transport);
        fill_valid_draft(&state.sessions);

        let dropped = tokio::time::timeout(
            Duration::from_millis(20),
            submit_transaction_endpoint(State(state.clone()), Extension(test_user())),
        )
        .await;
        assert!(dropped.is_err(), "the request should have been dropped");

        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(session_state(&state.sessions), FormState::Submitted);
        let reset = state
            .sessions
            .with_session(test_user().name(), String::new, |session| {
                session.reset("2025-03-02")
            })
            .unwrap();
        assert_eq!(reset, Ok(()));
    }

    #[tokio::test]
    async fn dropped_request_with_failing_transport_returns_to_editing() {
        let transport = Arc::new(
            FakeTransport::failing(TransportError::Status(503)).after(Duration::from_millis(200)),
        );
        let state = get_state(transport);
        fill_valid_draft(&state.sessions);

        let dropped = tokio::time::timeout(
            Duration::from_millis(20),
            submit_transaction_endpoint(State(state.clone()), Extension(test_user())),
        )
        .await;
        assert!(dropped.is_err(), "the request should have been dropped");

        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(session_state(&state.sessions), FormState::Editing);
    }

    #[derive(Debug)]
    struct PanickingTransport;

    #[async_trait]
    impl Transport for PanickingTransport {
        async fn post_json(&self, _url: &str, _body: String) -> Result<String, TransportError> {
            panic!("transport failed unexpectedly");
        }
    }

    #[tokio::test]
    async fn transport_panic_renders_banner_and_returns_to_editing() {
        let state = SubmitState {
            sessions: FormSessions::default(),
            local_timezone: "Etc/UTC".to_owned(),
            transport: Arc::new(PanickingTransport),
            endpoint_url: ENDPOINT_URL.to_owned(),
        };
        fill_valid_draft(&state.sessions);

        let response =
            submit_transaction_endpoint(State(state.clone()), Extension(test_user())).await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        let banner = html
            .select(&Selector::parse("#submission-error").unwrap())
            .next()
            .expect("banner missing")
            .text()
            .collect::<String>();
        assert!(
            banner.contains("Failed to submit transaction. Please try again."),
            "got banner {banner:?}"
        );
        assert_eq!(session_state(&state.sessions), FormState::Editing);
    }
}
