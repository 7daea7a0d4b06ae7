//! Transaction records and the static dataset they are loaded from.
//!
//! This module contains:
//! - The [TransactionRecord] model and its supporting types
//! - Loading and validating the JSON dataset at start-up

mod dataset;
mod record;

pub use dataset::{load_transactions, parse_transactions};
pub use record::{REVENUE_CATEGORY, TransactionId, TransactionRecord, TransactionStatus};

pub(crate) use record::parse_record_date;
