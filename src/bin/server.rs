use std::{env, error::Error, fs::OpenOptions, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{
    EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt,
};

use penta_rs::{
    AppState, SECRET_ENV_VAR, ServerConfig, build_router, count_users, graceful_shutdown,
    load_transactions, logging_middleware,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    setup_logging()?;

    let config = ServerConfig::parse();

    let secret = env::var(SECRET_ENV_VAR).map_err(|error| {
        tracing::error!("The environment variable '{SECRET_ENV_VAR}' must be set: {error}");
        error
    })?;

    let transactions = load_transactions(&config.data_path)?;

    let connection = Connection::open(&config.db_path).map_err(|error| {
        tracing::error!("Could not open the database at {:?}: {error}", config.db_path);
        error
    })?;
    let state = AppState::new(connection, &secret, transactions)?;

    match state.db_connection.lock() {
        Ok(connection) => tracing::info!("{} registered users", count_users(&connection)?),
        Err(_) => return Err("could not acquire the database lock".into()),
    }

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(state).layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router);

    let addr = config.socket_addr();
    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}

/// Log INFO and above to stdout, or whatever `RUST_LOG` asks for, and
/// everything at DEBUG and above to `debug.log`.
fn setup_logging() -> Result<(), std::io::Error> {
    let stdout_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(stdout_filter);

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")?;

    let debug_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(filter::LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();

    Ok(())
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
        // Errors are already logged by the error type, so don't log 5xx responses twice.
        .on_failure(());

    router.layer(tracing_layer)
}
