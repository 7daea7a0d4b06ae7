//! Turns raw query-string values into typed filter and sort parameters.
//!
//! Malformed values never fail a request. The offending constraint is left
//! unset and a [ValidationNotice] is returned alongside the parsed value so
//! the client can tell the user what was ignored.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{Date, UtcOffset};

use crate::transaction::{TransactionStatus, parse_record_date};

use super::{
    filter::FilterCriteria,
    sort::{SortDirection, SortField, SortSpec},
};

/// The value the filter drop-downs send when no option is selected.
pub const ALL_SENTINEL: &str = "All";

/// A filter or sort value that was ignored because it could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationNotice {
    /// The query parameter the value came from.
    pub field: &'static str,
    pub message: String,
}

impl ValidationNotice {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// The filter parameters as they appear in the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterQuery {
    pub status: Option<String>,
    pub category: Option<String>,
    pub user_id: Option<String>,
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub search: Option<String>,
}

impl FilterQuery {
    /// Parse the query into [FilterCriteria], collecting a notice for every
    /// value that had to be ignored.
    pub fn into_criteria(self) -> (FilterCriteria, Vec<ValidationNotice>) {
        let mut notices = Vec::new();

        let status = selection(self.status).and_then(|status| {
            match status.as_str() {
                "Paid" => Some(TransactionStatus::Paid),
                "Pending" => Some(TransactionStatus::Pending),
                other => {
                    notices.push(ValidationNotice::new(
                        "status",
                        format!(
                            "\"{other}\" is not a transaction status, expected \"Paid\" or \"Pending\""
                        ),
                    ));
                    None
                }
            }
        });

        let min_amount = parse_amount("min_amount", self.min_amount, &mut notices);
        let max_amount = parse_amount("max_amount", self.max_amount, &mut notices);
        let date_from = parse_date("date_from", self.date_from, &mut notices);
        let date_to = parse_date("date_to", self.date_to, &mut notices);

        let criteria = FilterCriteria {
            status,
            category: selection(self.category),
            user_id: selection(self.user_id),
            min_amount,
            max_amount,
            date_from,
            date_to,
            search: self.search.filter(|term| !term.trim().is_empty()),
        };

        (criteria, notices)
    }
}

/// The sort parameters as they appear in the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SortQuery {
    pub sort: Option<String>,
    pub direction: Option<String>,
}

impl SortQuery {
    /// Parse the query into a [SortSpec].
    ///
    /// A missing field or direction falls back to the default sort. So does an
    /// unrecognised one, with a notice.
    pub fn into_spec(self) -> (SortSpec, Vec<ValidationNotice>) {
        let mut notices = Vec::new();
        let default = SortSpec::default();

        let field = parse_or_notice::<SortField>("sort", self.sort, &mut notices)
            .unwrap_or(default.field);
        let direction = parse_or_notice::<SortDirection>("direction", self.direction, &mut notices)
            .unwrap_or(default.direction);

        (SortSpec::new(field, direction), notices)
    }
}

/// Treats a missing value, an empty string and [ALL_SENTINEL] as no selection.
fn selection(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty() && value != ALL_SENTINEL)
}

fn parse_or_notice<T>(
    field: &'static str,
    value: Option<String>,
    notices: &mut Vec<ValidationNotice>,
) -> Option<T>
where
    T: FromStr<Err = String>,
{
    let value = value.filter(|value| !value.is_empty())?;

    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(message) => {
            notices.push(ValidationNotice::new(field, message));
            None
        }
    }
}

fn parse_amount(
    field: &'static str,
    value: Option<String>,
    notices: &mut Vec<ValidationNotice>,
) -> Option<f64> {
    let value = value.filter(|value| !value.trim().is_empty())?;

    match value.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() => Some(amount),
        _ => {
            notices.push(ValidationNotice::new(
                field,
                format!("\"{value}\" is not a number, the bound was ignored"),
            ));
            None
        }
    }
}

fn parse_date(
    field: &'static str,
    value: Option<String>,
    notices: &mut Vec<ValidationNotice>,
) -> Option<Date> {
    let value = value.filter(|value| !value.trim().is_empty())?;

    match parse_record_date(value.trim()) {
        Ok(date_time) => Some(date_time.to_offset(UtcOffset::UTC).date()),
        Err(error) => {
            tracing::debug!("could not parse {field}={value}: {error}");
            notices.push(ValidationNotice::new(
                field,
                format!("\"{value}\" is not a date, expected YYYY-MM-DD"),
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        report::{FilterCriteria, SortDirection, SortField, SortSpec},
        transaction::TransactionStatus,
    };

    use super::{FilterQuery, SortQuery};

    fn some(value: &str) -> Option<String> {
        Some(value.to_owned())
    }

    #[test]
    fn empty_query_gives_empty_criteria() {
        let (criteria, notices) = FilterQuery::default().into_criteria();

        assert!(criteria.is_empty());
        assert!(notices.is_empty());
    }

    #[test]
    fn parses_every_filter() {
        let query = FilterQuery {
            status: some("Pending"),
            category: some("Revenue"),
            user_id: some("user_001"),
            min_amount: some("-10.5"),
            max_amount: some(" 200 "),
            date_from: some("2024-01-05"),
            date_to: some("2024-02-01T23:30:00-05:00"),
            search: some("acme"),
        };

        let (criteria, notices) = query.into_criteria();

        assert!(notices.is_empty(), "unexpected notices: {notices:?}");
        assert_eq!(
            criteria,
            FilterCriteria::new()
                .status(TransactionStatus::Pending)
                .category("Revenue")
                .user_id("user_001")
                .min_amount(-10.5)
                .max_amount(200.0)
                .date_from(date!(2024 - 01 - 05))
                .date_to(date!(2024 - 02 - 02))
                .search("acme")
        );
    }

    #[test]
    fn all_sentinel_and_empty_strings_are_no_constraint() {
        let query = FilterQuery {
            status: some("All"),
            category: some("All"),
            user_id: some(""),
            search: some("   "),
            ..Default::default()
        };

        let (criteria, notices) = query.into_criteria();

        assert!(criteria.is_empty());
        assert!(notices.is_empty());
    }

    #[test]
    fn malformed_amount_is_ignored_with_notice() {
        let query = FilterQuery {
            min_amount: some("abc"),
            max_amount: some("NaN"),
            ..Default::default()
        };

        let (criteria, notices) = query.into_criteria();

        assert_eq!(criteria.min_amount, None);
        assert_eq!(criteria.max_amount, None);
        let fields: Vec<_> = notices.iter().map(|notice| notice.field).collect();
        assert_eq!(fields, vec!["min_amount", "max_amount"]);
    }

    #[test]
    fn malformed_date_and_status_are_ignored_with_notice() {
        let query = FilterQuery {
            status: some("Refunded"),
            date_from: some("yesterday"),
            date_to: some("2024-13-01"),
            ..Default::default()
        };

        let (criteria, notices) = query.into_criteria();

        assert!(criteria.is_empty());
        let fields: Vec<_> = notices.iter().map(|notice| notice.field).collect();
        assert_eq!(fields, vec!["status", "date_from", "date_to"]);
    }

    #[test]
    fn missing_sort_gives_default() {
        let (spec, notices) = SortQuery::default().into_spec();

        assert_eq!(spec, SortSpec::default());
        assert!(notices.is_empty());
    }

    #[test]
    fn parses_sort() {
        let query = SortQuery {
            sort: some("amount"),
            direction: some("asc"),
        };

        let (spec, notices) = query.into_spec();

        assert_eq!(
            spec,
            SortSpec::new(SortField::Amount, SortDirection::Ascending)
        );
        assert!(notices.is_empty());
    }

    #[test]
    fn unknown_sort_falls_back_with_notice() {
        let query = SortQuery {
            sort: some("name"),
            direction: some("sideways"),
        };

        let (spec, notices) = query.into_spec();

        assert_eq!(spec, SortSpec::default());
        assert_eq!(notices.len(), 2);
    }
}
