use std::{sync::Mutex, time::Duration};

use async_trait::async_trait;

use crate::{
    drawer::{Transport, TransportError},
    identity::{CurrentUser, IdentityConfig},
};

pub(crate) const TEST_USER: &str = "cashier@example.com";

pub(crate) fn test_user() -> CurrentUser {
    CurrentUser::new(TEST_USER)
}

pub(crate) fn test_identity_config() -> IdentityConfig {
    IdentityConfig {
        user_header: "x-forwarded-user".to_owned(),
        sign_in_url: "/oauth2/start".to_owned(),
        sign_out_url: "/oauth2/sign_out".to_owned(),
    }
}

/// A [Transport] that records every request and answers with a canned outcome.
#[derive(Debug)]
pub(crate) struct FakeTransport {
    outcome: Result<String, TransportError>,
    delay: Duration,
    requests: Mutex<Vec<(String, String)>>,
}

impl FakeTransport {
    pub(crate) fn responding(response: &str) -> Self {
        Self {
            outcome: Ok(response.to_owned()),
            delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(error: TransportError) -> Self {
        Self {
            outcome: Err(error),
            delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Wait `delay` before answering, like a slow endpoint.
    pub(crate) fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// The `(url, body)` of every request made so far.
    pub(crate) fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn post_json(&self, url: &str, body: String) -> Result<String, TransportError> {
        self.requests.lock().unwrap().push((url.to_owned(), body));

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.outcome.clone()
    }
}
