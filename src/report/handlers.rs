//! Route handlers that serve the reporting pipeline as JSON.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
};
use serde::Serialize;

use crate::{AppState, Error, auth::Claims, transaction::TransactionRecord};

use super::{
    aggregation::Report,
    cards::DashboardCards,
    filter::filter_transactions,
    options::FilterOptions,
    query::{FilterQuery, SortQuery, ValidationNotice},
    sort::sort_transactions,
};

/// The state needed by the reporting routes.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The read-only snapshot of the transaction dataset.
    pub transactions: Arc<[TransactionRecord]>,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transactions: state.transactions.clone(),
        }
    }
}

/// Run the filter and sort stages for one request.
///
/// Returns the selected transactions with every notice raised while parsing
/// the query.
pub fn select_transactions<'a>(
    transactions: &'a [TransactionRecord],
    filter_query: FilterQuery,
    sort_query: SortQuery,
) -> (Vec<&'a TransactionRecord>, Vec<ValidationNotice>) {
    let (criteria, mut notices) = filter_query.into_criteria();
    let (sort_spec, sort_notices) = sort_query.into_spec();
    notices.extend(sort_notices);

    let filtered = filter_transactions(transactions, &criteria);
    let sorted = sort_transactions(&filtered, sort_spec);

    (sorted, notices)
}

#[derive(Debug, Serialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<TransactionRecord>,
    pub notices: Vec<ValidationNotice>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    #[serde(flatten)]
    pub report: Report,
    pub notices: Vec<ValidationNotice>,
}

/// List the transactions that match the filters, in the requested order.
pub async fn get_transactions(
    State(state): State<ReportState>,
    _claims: Claims,
    filter_query: Result<Query<FilterQuery>, QueryRejection>,
    sort_query: Result<Query<SortQuery>, QueryRejection>,
) -> Result<Json<TransactionsResponse>, Error> {
    let Query(filter_query) = filter_query?;
    let Query(sort_query) = sort_query?;

    let (transactions, notices) =
        select_transactions(&state.transactions, filter_query, sort_query);
    tracing::debug!(
        "selected {} of {} transactions",
        transactions.len(),
        state.transactions.len()
    );

    Ok(Json(TransactionsResponse {
        transactions: transactions.into_iter().cloned().collect(),
        notices,
    }))
}

/// Aggregate the transactions that match the filters.
pub async fn get_report(
    State(state): State<ReportState>,
    _claims: Claims,
    filter_query: Result<Query<FilterQuery>, QueryRejection>,
) -> Result<Json<ReportResponse>, Error> {
    let Query(filter_query) = filter_query?;
    let (criteria, notices) = filter_query.into_criteria();
    let filtered = filter_transactions(state.transactions.iter(), &criteria);

    Ok(Json(ReportResponse {
        report: Report::from_transactions(&filtered),
        notices,
    }))
}

/// The summary cards, computed over the whole dataset.
pub async fn get_dashboard_cards(
    State(state): State<ReportState>,
    _claims: Claims,
) -> Json<DashboardCards> {
    Json(DashboardCards::from_transactions(state.transactions.iter()))
}

/// The categories and users to offer in the filter drop-downs.
pub async fn get_filter_options(
    State(state): State<ReportState>,
    _claims: Claims,
) -> Json<FilterOptions> {
    Json(FilterOptions::from_transactions(state.transactions.iter()))
}
