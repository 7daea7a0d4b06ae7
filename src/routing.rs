//! Application router configuration.
//!
//! The data routes are protected by the [Claims](crate::auth::Claims)
//! extractor in each handler rather than by a middleware layer, so a missing
//! or invalid token is rejected before the handler body runs.

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::{
    AppState, Error,
    auth::{log_in, sign_up},
    csv_export::export_transactions,
    endpoints,
    report::{get_dashboard_cards, get_filter_options, get_report, get_transactions},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route(endpoints::SIGN_UP, post(sign_up))
        .route(endpoints::LOG_IN, post(log_in));

    let data_routes = Router::new()
        .route(endpoints::TRANSACTIONS, get(get_transactions))
        .route(endpoints::EXPORT, get(export_transactions))
        .route(endpoints::REPORT, get(get_report))
        .route(endpoints::DASHBOARD_CARDS, get(get_dashboard_cards))
        .route(endpoints::FILTER_OPTIONS, get(get_filter_options));

    Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .merge(auth_routes)
        .merge(data_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, "I'm a teapot").into_response()
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}
