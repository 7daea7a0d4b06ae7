//! The sort stage of the reporting pipeline.
//!
//! Sorting is a pure function of an explicit [SortSpec]. The interactive
//! "click the same column to flip the direction" behaviour lives in
//! [SortSpec::toggle] so callers can keep that state outside the pipeline.

use std::{cmp::Ordering, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::transaction::TransactionRecord;

/// The transaction field to sort by.
///
/// Any record field can be selected, but only [SortField::Amount],
/// [SortField::Date] and [SortField::UserId] reorder transactions. Sorting by
/// any other field keeps the input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Id,
    Date,
    Amount,
    Category,
    Status,
    UserId,
    UserProfile,
}

impl SortField {
    /// The field name as used in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Category => "category",
            Self::Status => "status",
            Self::UserId => "user_id",
            Self::UserProfile => "user_profile",
        }
    }
}

impl Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "date" => Ok(Self::Date),
            "amount" => Ok(Self::Amount),
            "category" => Ok(Self::Category),
            "status" => Ok(Self::Status),
            "user_id" => Ok(Self::UserId),
            "user_profile" => Ok(Self::UserProfile),
            other => Err(format!("\"{other}\" is not a transaction field")),
        }
    }
}

/// The order to sort transactions in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value.
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(format!(
                "\"{other}\" is not a sort direction, expected \"asc\" or \"desc\""
            )),
        }
    }
}

/// A field and direction to sort transactions by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    /// Newest transactions first.
    fn default() -> Self {
        Self::new(SortField::Date, SortDirection::Descending)
    }
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// The sort to use after the user asks to sort by `field`.
    ///
    /// Asking for the active field flips the direction, asking for a new
    /// field sorts by it in ascending order.
    #[must_use]
    pub fn toggle(self, field: SortField) -> Self {
        if field == self.field {
            Self::new(field, self.direction.reversed())
        } else {
            Self::new(field, SortDirection::Ascending)
        }
    }
}

/// Return the transactions ordered by `spec`, leaving the input untouched.
///
/// Uses a stable sort, so transactions with equal keys keep their relative
/// order in both directions.
///
/// `user_id` is compared by Unicode code point rather than with locale-aware
/// collation.
pub fn sort_transactions<'a>(
    transactions: &[&'a TransactionRecord],
    spec: SortSpec,
) -> Vec<&'a TransactionRecord> {
    let mut sorted = transactions.to_vec();

    let compare: fn(&TransactionRecord, &TransactionRecord) -> Ordering = match spec.field {
        SortField::Amount => |a, b| a.amount.total_cmp(&b.amount),
        SortField::Date => |a, b| a.date.cmp(&b.date),
        SortField::UserId => |a, b| a.user_id.cmp(&b.user_id),
        SortField::Id
        | SortField::Category
        | SortField::Status
        | SortField::UserProfile => return sorted,
    };

    sorted.sort_by(|a, b| spec.direction.apply(compare(a, b)));
    sorted
}
