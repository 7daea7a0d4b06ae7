//! The filter stage of the reporting pipeline.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::transaction::{TransactionRecord, TransactionStatus};

/// The constraints a transaction must satisfy to be included in a report.
///
/// Every field is optional and `None` means there is no constraint on that
/// dimension, so the default criteria match every transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Only include transactions with this status.
    pub status: Option<TransactionStatus>,
    /// Only include transactions with exactly this category (case-sensitive).
    pub category: Option<String>,
    /// Only include transactions with exactly this user ID (case-sensitive).
    pub user_id: Option<String>,
    /// Inclusive lower bound on the signed amount.
    pub min_amount: Option<f64>,
    /// Inclusive upper bound on the signed amount.
    pub max_amount: Option<f64>,
    /// Inclusive lower bound on the UTC calendar date.
    pub date_from: Option<Date>,
    /// Inclusive upper bound on the UTC calendar date.
    pub date_to: Option<Date>,
    /// Case-insensitive substring matched against the user ID or category.
    pub search: Option<String>,
}

impl FilterCriteria {
    /// Create criteria that match every transaction.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only match transactions with `status`.
    #[must_use]
    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Only match transactions in `category`.
    #[must_use]
    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_owned());
        self
    }

    /// Only match transactions for `user_id`.
    #[must_use]
    pub fn user_id(mut self, user_id: &str) -> Self {
        self.user_id = Some(user_id.to_owned());
        self
    }

    /// Only match transactions with an amount of at least `amount`.
    #[must_use]
    pub fn min_amount(mut self, amount: f64) -> Self {
        self.min_amount = Some(amount);
        self
    }

    /// Only match transactions with an amount of at most `amount`.
    #[must_use]
    pub fn max_amount(mut self, amount: f64) -> Self {
        self.max_amount = Some(amount);
        self
    }

    /// Only match transactions on or after `date`.
    #[must_use]
    pub fn date_from(mut self, date: Date) -> Self {
        self.date_from = Some(date);
        self
    }

    /// Only match transactions on or before `date`.
    #[must_use]
    pub fn date_to(mut self, date: Date) -> Self {
        self.date_to = Some(date);
        self
    }

    /// Only match transactions whose user ID or category contains `term`.
    #[must_use]
    pub fn search(mut self, term: &str) -> Self {
        self.search = Some(term.to_owned());
        self
    }

    /// Returns true if the criteria place no constraint on any dimension.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.category.is_none()
            && self.user_id.is_none()
            && self.lower_amount_bound().is_none()
            && self.upper_amount_bound().is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.search_term().is_none()
    }

    /// Check `transaction` against every specified constraint.
    pub fn matches(&self, transaction: &TransactionRecord) -> bool {
        if self.status.is_some_and(|status| transaction.status != status) {
            return false;
        }

        if self
            .category
            .as_ref()
            .is_some_and(|category| &transaction.category != category)
        {
            return false;
        }

        if self
            .user_id
            .as_ref()
            .is_some_and(|user_id| &transaction.user_id != user_id)
        {
            return false;
        }

        if self.lower_amount_bound().is_some_and(|min| transaction.amount < min) {
            return false;
        }

        if self.upper_amount_bound().is_some_and(|max| transaction.amount > max) {
            return false;
        }

        let date = transaction.calendar_date();

        if self.date_from.is_some_and(|from| date < from) {
            return false;
        }

        if self.date_to.is_some_and(|to| date > to) {
            return false;
        }

        if let Some(term) = self.search_term() {
            let term = term.to_lowercase();

            return transaction.user_id.to_lowercase().contains(&term)
                || transaction.category.to_lowercase().contains(&term);
        }

        true
    }

    // Non-finite bounds are ignored so that NaN never silently excludes everything.
    fn lower_amount_bound(&self) -> Option<f64> {
        self.min_amount.filter(|amount| amount.is_finite())
    }

    fn upper_amount_bound(&self) -> Option<f64> {
        self.max_amount.filter(|amount| amount.is_finite())
    }

    fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|term| !term.is_empty())
    }
}

/// Select the transactions that satisfy `criteria`, keeping their original
/// relative order.
pub fn filter_transactions<'a, I>(
    transactions: I,
    criteria: &FilterCriteria,
) -> Vec<&'a TransactionRecord>
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    transactions
        .into_iter()
        .filter(|transaction| criteria.matches(transaction))
        .collect()
}
