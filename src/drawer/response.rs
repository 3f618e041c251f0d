//! Reads the transaction ID out of the recording endpoint's response.

use serde_json::{Map, Value};

/// The outcome of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionResult {
    /// The ID the endpoint assigned to the transaction, if it sent one.
    pub transaction_id: Option<String>,
    /// The response body exactly as it was received.
    pub raw_response: String,
}

/// The response could not be understood at all.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ResponseError {
    /// The body was not valid JSON.
    #[error("Invalid response format from server")]
    NotJson(String),

    /// The body was JSON but not an object.
    #[error("Unexpected response from server")]
    NotAnObject,
}

/// Parse the endpoint's response text into a [SubmissionResult].
///
/// The ID is looked up under `body` first, where `body` may be an object or
/// a string holding JSON, and otherwise at the top level as `transactionId`.
/// A response without an ID is still a success.
///
/// # Errors
/// Returns an error if `raw_response` is not a JSON object.
pub fn parse_submission_response(raw_response: &str) -> Result<SubmissionResult, ResponseError> {
    let value: Value = serde_json::from_str(raw_response).map_err(|error| {
        tracing::error!("Could not parse submission response as JSON: {error}");
        ResponseError::NotJson(error.to_string())
    })?;

    let Value::Object(envelope) = value else {
        tracing::error!("Submission response was JSON but not an object: {raw_response}");
        return Err(ResponseError::NotAnObject);
    };

    let transaction_id = extract_transaction_id(&envelope);

    match &transaction_id {
        Some(id) => tracing::debug!("Extracted transaction ID {id}"),
        None => tracing::warn!("No transactionId found in response: {raw_response}"),
    }

    Ok(SubmissionResult {
        transaction_id,
        raw_response: raw_response.to_owned(),
    })
}

/// Whether `body` counts as absent, in which case the ID is read from the
/// top level of the envelope.
fn is_falsy(body: &Value) -> bool {
    match body {
        Value::Null | Value::Bool(false) => true,
        Value::String(body) => body.is_empty(),
        Value::Number(body) => body.as_f64() == Some(0.0),
        _ => false,
    }
}

fn extract_transaction_id(envelope: &Map<String, Value>) -> Option<String> {
    match envelope.get("body") {
        None => id_from_object(envelope),
        Some(body) if is_falsy(body) => id_from_object(envelope),
        Some(Value::Object(body)) => id_from_object(body),
        Some(Value::String(body)) => match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(body)) => id_from_object(&body),
            Ok(_) => None,
            Err(error) => {
                tracing::error!("Could not parse response body {body:?}: {error}");
                None
            }
        },
        Some(_) => None,
    }
}

fn id_from_object(object: &Map<String, Value>) -> Option<String> {
    match object.get("transactionId")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
