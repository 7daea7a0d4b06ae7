//! Defines the transaction record as it appears in the dataset.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, UtcOffset};

/// The category label that marks a transaction as income.
///
/// Every other category is treated as an expense.
pub const REVENUE_CATEGORY: &str = "Revenue";

/// Alias for the integer type used for transaction IDs.
pub type TransactionId = i64;

mod date_format {
    //! Reads either an RFC 3339 date-time or a plain `YYYY-MM-DD` date, and
    //! always writes RFC 3339.
    //!
    //! Plain dates are read as midnight UTC, which matches how a browser
    //! parses a date-only ISO string.
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{
        Date, OffsetDateTime,
        format_description::{BorrowedFormatItem, well_known::Rfc3339},
        macros::format_description,
    };

    const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

    pub fn parse(text: &str) -> Result<OffsetDateTime, time::error::Parse> {
        match OffsetDateTime::parse(text, &Rfc3339) {
            Ok(date_time) => Ok(date_time),
            Err(_) => Date::parse(text, DATE_FORMAT).map(|date| date.midnight().assume_utc()),
        }
    }

    pub fn serialize<S>(dt: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = dt.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }
}

pub(crate) use date_format::parse as parse_record_date;

/// Whether a transaction has been settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// The money has moved.
    Paid,
    /// The transaction has been recorded but not settled.
    Pending,
}

impl TransactionStatus {
    /// The status as it is written in the dataset.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Pending => "Pending",
        }
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entry in the transaction dataset.
///
/// Records are read-only: the reporting pipeline derives views from them but
/// never changes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Unique within the dataset.
    pub id: TransactionId,
    /// When the transaction happened.
    #[serde(
        serialize_with = "date_format::serialize",
        deserialize_with = "date_format::deserialize"
    )]
    pub date: OffsetDateTime,
    /// The signed amount. Whether it counts as income or expense is decided by
    /// `category`, not by the sign.
    pub amount: f64,
    /// Free-form label, see [REVENUE_CATEGORY].
    pub category: String,
    /// Whether the transaction has been settled.
    pub status: TransactionStatus,
    /// Identifies the counterparty.
    pub user_id: String,
    /// Avatar URL for the counterparty, only used for display.
    pub user_profile: String,
}

impl TransactionRecord {
    /// Whether the record counts as income.
    pub fn is_revenue(&self) -> bool {
        self.category == REVENUE_CATEGORY
    }

    /// The UTC calendar date of the record, with the time of day dropped.
    pub fn calendar_date(&self) -> Date {
        self.date.to_offset(UtcOffset::UTC).date()
    }
}
