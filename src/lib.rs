//! Cash Drawer is a web app for counting a cash register drawer at the end of
//! a shift and recording the count with a remote transaction service.
//!
//! This library provides a REST API that directly serves HTML pages. Each
//! signed-in cashier gets their own draft, which is validated, totalled and
//! sent to the recording endpoint as JSON.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod drawer;
mod endpoints;
mod error;
mod html;
mod identity;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, SubmissionConfig};
pub use drawer::{
    DerivedTotals, Draft, ErrorKey, Field, FormSession, FormSessions, FormState, HttpTransport,
    PAY_OUT_SLOTS, PayOut, PayOutSlot, ResponseError, SubmissionPayload, SubmissionResult,
    Transport, TransportError, ValidationErrors, coerce_amount, derive_totals,
    parse_submission_response, round2, validate,
};
pub use error::Error;
pub use identity::{CurrentUser, DEFAULT_USER_HEADER, IdentityConfig};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not listen for the ctrl+c signal: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not listen for the terminate signal: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
