//! Penta is the backend for a personal finance dashboard.
//!
//! This library provides a JSON API over a read-only snapshot of transaction
//! records, loaded once at start-up. Each request runs the reporting pipeline
//! (filter, sort, aggregate, export) over that snapshot. Users sign up and log
//! in against a SQLite user table and use the issued bearer token for the
//! data routes.

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod config;
mod csv_export;
mod db;
mod endpoints;
mod error;
mod logging;
mod password;
mod report;
mod routing;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, DEFAULT_TOKEN_DURATION, create_jwt_keys};
pub use auth::{
    Claims, JwtKeys, LogInRequest, LogInResponse, SignUpRequest, SignUpResponse, decode_token,
    encode_token,
};
pub use config::{SECRET_ENV_VAR, ServerConfig};
pub use csv_export::{ExportColumn, export_csv, parse_columns};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use password::{PasswordHash, ValidatedPassword};
pub use report::{
    ALL_SENTINEL, CategoryAggregate, DashboardCards, EXPENSE_CATEGORY, FilterCriteria,
    FilterOptions, FilterQuery, MonthlyAggregate, Report, SAVINGS_RATE, SortDirection, SortField,
    SortQuery, SortSpec, SummaryTotals, ValidationNotice, category_aggregates, filter_transactions,
    month_label, monthly_aggregates, select_transactions, sort_transactions, summary_totals,
};
pub use routing::build_router;
pub use transaction::{
    REVENUE_CATEGORY, TransactionId, TransactionRecord, TransactionStatus, load_transactions,
    parse_transactions,
};
pub use user::{User, UserID, count_users, get_user_by_email, parse_email, update_password};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
        },
    }

    handle.graceful_shutdown(Some(Duration::from_secs(1)));
}
