//! Headline figures for the dashboard summary cards.

use serde::Serialize;

use crate::transaction::{TransactionRecord, TransactionStatus};

/// The category counted by the expenses card.
///
/// Unlike the reporting aggregates, the cards only count this exact category
/// as an expense.
pub const EXPENSE_CATEGORY: &str = "Expense";

/// The share of revenue shown on the savings card.
pub const SAVINGS_RATE: f64 = 0.1;

/// The four summary cards shown at the top of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DashboardCards {
    pub balance: f64,
    pub revenue: f64,
    pub expenses: f64,
    pub savings: f64,
}

impl DashboardCards {
    /// Compute the cards from settled transactions only.
    ///
    /// These figures are taken over the whole dataset and ignore any filters.
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a TransactionRecord>,
    {
        let (revenue, expenses) = transactions
            .into_iter()
            .filter(|transaction| transaction.status == TransactionStatus::Paid)
            .fold((0.0, 0.0), |(revenue, expenses), transaction| {
                if transaction.is_revenue() {
                    (revenue + transaction.amount, expenses)
                } else if transaction.category == EXPENSE_CATEGORY {
                    (revenue, expenses + transaction.amount)
                } else {
                    (revenue, expenses)
                }
            });

        Self {
            balance: revenue - expenses,
            revenue,
            expenses,
            savings: revenue * SAVINGS_RATE,
        }
    }
}
