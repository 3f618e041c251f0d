use std::{fs::OpenOptions, net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{
    EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt,
};

use cashdrawer_rs::{
    AppState, DEFAULT_USER_HEADER, HttpTransport, IdentityConfig, SubmissionConfig, build_router,
    graceful_shutdown, logging_middleware,
};

/// The web server for counting and recording a cash drawer.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The URL completed transactions are POSTed to as JSON.
    #[arg(long)]
    submit_url: String,

    /// The canonical name of the local timezone, e.g. "America/Puerto_Rico".
    #[arg(long, default_value = "America/Puerto_Rico")]
    timezone: String,

    /// The request header the authenticating proxy puts the user name in.
    #[arg(long, default_value = DEFAULT_USER_HEADER)]
    user_header: String,

    /// Where requests without a signed-in user are redirected.
    #[arg(long, default_value = "/oauth2/start")]
    sign_in_url: String,

    /// Where the "Sign out" link sends the user.
    #[arg(long, default_value = "/oauth2/sign_out")]
    sign_out_url: String,

    /// How long to wait for the recording endpoint before giving up.
    #[arg(long, default_value_t = 30)]
    request_timeout_secs: u64,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let transport = HttpTransport::new(Duration::from_secs(args.request_timeout_secs))
        .expect("Could not create the HTTP client.");

    let state = AppState::new(
        IdentityConfig {
            user_header: args.user_header,
            sign_in_url: args.sign_in_url,
            sign_out_url: args.sign_out_url,
        },
        SubmissionConfig {
            endpoint_url: args.submit_url,
        },
        Arc::new(transport),
        &args.timezone,
    )
    .expect("Could not create the app state.");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .unwrap();
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(env_filter),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router
        .layer(middleware::from_fn(logging_middleware))
        .layer(tracing_layer)
}
