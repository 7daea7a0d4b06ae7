//! The aggregation stage of the reporting pipeline.
//!
//! Provides monthly income/expense buckets for the bar chart, per-category
//! totals for the pie chart, and the scalar summary totals.

use std::collections::HashMap;

use serde::{Serialize, Serializer};
use time::Month;

use crate::transaction::TransactionRecord;

/// The income and expenses for one calendar month, across all years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyAggregate {
    /// Serialized as a three-letter label, e.g. "Jan".
    #[serde(serialize_with = "serialize_month_label")]
    pub month: Month,
    /// The sum of revenue amounts, rounded to cents.
    pub income: f64,
    /// The sum of all other amounts with their sign kept, rounded to cents.
    pub expenses: f64,
}

/// The absolute total for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAggregate {
    pub name: String,
    pub value: f64,
}

/// Scalar totals over a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryTotals {
    pub total_revenue: f64,
    /// Kept with its original sign, so expenses recorded as negative amounts
    /// give a negative total.
    pub total_expenses: f64,
    pub count: usize,
}

/// Every aggregate view derived from one filtered set of transactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub monthly: [MonthlyAggregate; 12],
    pub categories: Vec<CategoryAggregate>,
    pub summary: SummaryTotals,
}

impl Report {
    pub fn from_transactions(transactions: &[&TransactionRecord]) -> Self {
        Self {
            monthly: monthly_aggregates(transactions),
            categories: category_aggregates(transactions),
            summary: summary_totals(transactions),
        }
    }
}

/// Formats a month as a three-letter abbreviation (e.g., "Jan", "Feb").
pub fn month_label(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

fn serialize_month_label<S>(month: &Month, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(month_label(*month))
}

/// Buckets transaction amounts by the UTC calendar month of their date.
///
/// Always returns all twelve months in calendar order, regardless of the
/// year, with zero for months that have no transactions. Each bucket is
/// rounded to two decimal places.
pub fn monthly_aggregates(transactions: &[&TransactionRecord]) -> [MonthlyAggregate; 12] {
    let mut buckets: [MonthlyAggregate; 12] = std::array::from_fn(|index| MonthlyAggregate {
        month: Month::January.nth_next(index as u8),
        income: 0.0,
        expenses: 0.0,
    });

    for transaction in transactions {
        let index = transaction.calendar_date().month() as usize - 1;
        let bucket = &mut buckets[index];

        if transaction.is_revenue() {
            bucket.income += transaction.amount;
        } else {
            bucket.expenses += transaction.amount;
        }
    }

    for bucket in &mut buckets {
        bucket.income = round_to_cents(bucket.income);
        bucket.expenses = round_to_cents(bucket.expenses);
    }

    buckets
}

/// Sums amounts per category, in order of each category's first appearance,
/// and reports the absolute value of each sum.
pub fn category_aggregates(transactions: &[&TransactionRecord]) -> Vec<CategoryAggregate> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut aggregates: Vec<CategoryAggregate> = Vec::new();

    for transaction in transactions {
        let position = *positions
            .entry(transaction.category.as_str())
            .or_insert_with(|| {
                aggregates.push(CategoryAggregate {
                    name: transaction.category.clone(),
                    value: 0.0,
                });
                aggregates.len() - 1
            });

        aggregates[position].value += transaction.amount;
    }

    for aggregate in &mut aggregates {
        aggregate.value = aggregate.value.abs();
    }

    aggregates
}

/// Totals revenue and expenses without rounding.
pub fn summary_totals(transactions: &[&TransactionRecord]) -> SummaryTotals {
    let (total_revenue, total_expenses) =
        transactions
            .iter()
            .fold((0.0, 0.0), |(revenue, expenses), transaction| {
                if transaction.is_revenue() {
                    (revenue + transaction.amount, expenses)
                } else {
                    (revenue, expenses + transaction.amount)
                }
            });

    SummaryTotals {
        total_revenue,
        total_expenses,
        count: transactions.len(),
    }
}

// Also turns -0.0 into 0.0 so empty-looking buckets serialize as 0.
fn round_to_cents(amount: f64) -> f64 {
    let rounded = (amount * 100.0).round() / 100.0;

    if rounded == 0.0 { 0.0 } else { rounded }
}
