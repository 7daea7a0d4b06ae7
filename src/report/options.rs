//! The values offered in the filter drop-downs.

use std::collections::HashSet;

use serde::Serialize;

use crate::transaction::TransactionRecord;

/// The distinct categories and user IDs in the dataset, in order of first
/// appearance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub users: Vec<String>,
}

impl FilterOptions {
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a TransactionRecord>,
    {
        let mut seen_categories = HashSet::new();
        let mut seen_users = HashSet::new();
        let mut options = Self::default();

        for transaction in transactions {
            if seen_categories.insert(transaction.category.as_str()) {
                options.categories.push(transaction.category.clone());
            }

            if seen_users.insert(transaction.user_id.as_str()) {
                options.users.push(transaction.user_id.clone());
            }
        }

        options
    }
}
