//! Sends submission payloads to the transaction recording endpoint.

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

/// A submission that could not be delivered to the recording endpoint.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum TransportError {
    /// The payload could not be encoded as JSON.
    #[error("Could not encode the transaction: {0}")]
    Encoding(String),

    /// The request could not be sent or the response could not be read.
    #[error("Could not reach the server: {0}")]
    Network(String),

    /// The endpoint answered with a non-success HTTP status.
    #[error("The server responded with status {0}")]
    Status(u16),

    /// The request stopped before it produced an outcome, e.g. the
    /// transport panicked.
    #[error("Failed to submit transaction. Please try again.")]
    Interrupted,
}

/// Posts a JSON document and hands back the response text.
#[async_trait]
pub trait Transport: Debug + Send + Sync {
    /// POST `body` to `url` with a JSON content type.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response status is not a
    /// success.
    async fn post_json(&self, url: &str, body: String) -> Result<String, TransportError>;
}

/// A [Transport] backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport whose requests give up after `timeout`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client could not be initialised.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| TransportError::Network(error.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, body: String) -> Result<String, TransportError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|error| {
                tracing::error!("Could not send submission to {url}: {error}");
                TransportError::Network(error.to_string())
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|error| {
            tracing::error!("Could not read submission response from {url}: {error}");
            TransportError::Network(error.to_string())
        })?;

        tracing::debug!("Raw submission response ({status}): {text}");

        if !status.is_success() {
            tracing::error!("Submission to {url} failed with status {status}");
            return Err(TransportError::Status(status.as_u16()));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use axum::{
        Router,
        http::{HeaderMap, Method, StatusCode, header::CONTENT_TYPE},
        routing::any,
    };
    use tokio::net::TcpListener;

    use super::{HttpTransport, Transport, TransportError};

    /// The method, content type and body of one request the endpoint received.
    type Received = (Method, Option<String>, String);

    /// Serve an endpoint on a free local port that records every request and
    /// answers with `status` and `response`.
    async fn spawn_endpoint(
        status: StatusCode,
        response: &'static str,
    ) -> (String, Arc<Mutex<Vec<Received>>>) {
        let received = Arc::new(Mutex::new(Vec::new()));
        let recorder = received.clone();

        let app = Router::new().route(
            "/transactions",
            any(move |method: Method, headers: HeaderMap, body: String| {
                let recorder = recorder.clone();
                async move {
                    let content_type = headers
                        .get(CONTENT_TYPE)
                        .and_then(|value| value.to_str().ok())
                        .map(str::to_owned);
                    recorder.lock().unwrap().push((method, content_type, body));

                    (status, response)
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        (format!("http://{address}/transactions"), received)
    }

    fn get_transport() -> HttpTransport {
        HttpTransport::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn posts_json_and_returns_body_unchanged() {
        let response = r#"{"body":"{\"transactionId\":\"abc123\"}"}"#;
        let (url, received) = spawn_endpoint(StatusCode::OK, response).await;
        let payload = r#"{"transactionDate":"2025-03-01","netTotal":20.5}"#;

        let result = get_transport().post_json(&url, payload.to_owned()).await;

        assert_eq!(result, Ok(response.to_owned()));
        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        let (method, content_type, body) = &received[0];
        assert_eq!(*method, Method::POST);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(body, payload);
    }

    #[tokio::test]
    async fn error_status_is_a_status_error_even_with_json_body() {
        let (url, received) =
            spawn_endpoint(StatusCode::BAD_GATEWAY, r#"{"transactionId":"tx-1"}"#).await;

        let result = get_transport().post_json(&url, "{}".to_owned()).await;

        assert_eq!(result, Err(TransportError::Status(502)));
        assert_eq!(received.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        let transport = HttpTransport::new(Duration::from_secs(1)).unwrap();

        let result = transport
            .post_json("http://127.0.0.1:1/transactions", "{}".to_owned())
            .await;

        assert!(
            matches!(result, Err(TransportError::Network(_))),
            "want network error, got {result:?}"
        );
    }
}
