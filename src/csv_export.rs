//! Exports transactions as a CSV file.
//!
//! The export schema does not mirror the record schema. The columns map onto
//! record fields as follows:
//! - `name`: the counterparty's user ID,
//! - `date`: the UTC calendar date as `YYYY-MM-DD`,
//! - `amount`: the absolute amount with two decimals and a dollar sign,
//! - `status`: `Paid` or `Pending`.

use std::str::FromStr;

use axum::{
    extract::{Query, State, rejection::QueryRejection},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    Error,
    auth::Claims,
    report::{FilterQuery, ReportState, SortQuery, select_transactions},
    transaction::TransactionRecord,
};

/// A column that can be included in the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExportColumn {
    Name,
    Date,
    Amount,
    Status,
}

impl ExportColumn {
    /// Every column, in the order they appear in the file.
    pub const ALL: [ExportColumn; 4] = [Self::Name, Self::Date, Self::Amount, Self::Status];

    /// The header text for the column.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Date => "Date",
            Self::Amount => "Amount",
            Self::Status => "Status",
        }
    }

    /// The column's key in the `columns` query parameter.
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Status => "status",
        }
    }

    fn value(self, transaction: &TransactionRecord) -> String {
        match self {
            Self::Name => transaction.user_id.clone(),
            Self::Date => transaction.calendar_date().to_string(),
            Self::Amount => format!("${:.2}", transaction.amount.abs()),
            Self::Status => transaction.status.as_str().to_owned(),
        }
    }
}

impl FromStr for ExportColumn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|column| column.key() == s)
            .ok_or_else(|| Error::InvalidExportColumn(s.to_owned()))
    }
}

/// Parse a comma separated list of column keys, e.g. "name,amount".
///
/// Duplicates are dropped and the columns are returned in file order, not the
/// order they were listed in.
///
/// # Errors
/// Returns [Error::NoExportColumns] if no columns are listed, or
/// [Error::InvalidExportColumn] for the first key that is not a column.
pub fn parse_columns(text: &str) -> Result<Vec<ExportColumn>, Error> {
    let mut columns = text
        .split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(ExportColumn::from_str)
        .collect::<Result<Vec<_>, _>>()?;

    if columns.is_empty() {
        return Err(Error::NoExportColumns);
    }

    columns.sort();
    columns.dedup();

    Ok(columns)
}

/// Write `transactions` as CSV text with the selected `columns`.
///
/// The header row is left unquoted while every data value is quoted. Rows are
/// separated by `\n` and there is no trailing newline.
///
/// # Errors
/// Returns [Error::NoExportColumns] if `columns` is empty, or
/// [Error::CsvError] if the CSV could not be written.
pub fn export_csv(
    transactions: &[&TransactionRecord],
    columns: &[ExportColumn],
) -> Result<String, Error> {
    if columns.is_empty() {
        return Err(Error::NoExportColumns);
    }

    let mut header_writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    header_writer.write_record(columns.iter().map(|column| column.label()))?;
    let buffer = header_writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    let mut row_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buffer);

    for transaction in transactions {
        row_writer.write_record(columns.iter().map(|column| column.value(transaction)))?;
    }

    let buffer = row_writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;
    let mut text = String::from_utf8(buffer).map_err(|error| Error::CsvError(error.to_string()))?;

    if text.ends_with('\n') {
        text.pop();
    }

    Ok(text)
}

/// The export specific query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportQuery {
    /// Comma separated column keys, all columns if missing.
    pub columns: Option<String>,
}

/// Download the filtered and sorted transactions as a CSV file.
///
/// Takes the same filter and sort parameters as the transaction list.
pub async fn export_transactions(
    State(state): State<ReportState>,
    _claims: Claims,
    filter_query: Result<Query<FilterQuery>, QueryRejection>,
    sort_query: Result<Query<SortQuery>, QueryRejection>,
    export_query: Result<Query<ExportQuery>, QueryRejection>,
) -> Result<Response, Error> {
    let Query(filter_query) = filter_query?;
    let Query(sort_query) = sort_query?;
    let Query(export_query) = export_query?;

    let columns = match export_query.columns {
        Some(text) => parse_columns(&text)?,
        None => ExportColumn::ALL.to_vec(),
    };

    let (transactions, notices) =
        select_transactions(&state.transactions, filter_query, sort_query);

    if !notices.is_empty() {
        tracing::debug!("ignored export parameters: {notices:?}");
    }

    let body = export_csv(&transactions, &columns)?;
    let filename = format!("transactions-{}.csv", OffsetDateTime::now_utc().date());

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response())
}
