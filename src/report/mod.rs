//! The transaction reporting pipeline: filter, sort and aggregate.
//!
//! Every stage is a pure function over borrowed records, so a request can
//! re-derive all of its views from the shared dataset snapshot without
//! copying or mutating it.

mod aggregation;
mod cards;
mod filter;
mod handlers;
mod options;
mod query;
mod sort;

pub use aggregation::{
    CategoryAggregate, MonthlyAggregate, Report, SummaryTotals, category_aggregates, month_label,
    monthly_aggregates, summary_totals,
};
pub use cards::{DashboardCards, EXPENSE_CATEGORY, SAVINGS_RATE};
pub use filter::{FilterCriteria, filter_transactions};
pub use handlers::{
    ReportState, get_dashboard_cards, get_filter_options, get_report, get_transactions,
    select_transactions,
};
pub use options::FilterOptions;
pub use query::{ALL_SENTINEL, FilterQuery, SortQuery, ValidationNotice};
pub use sort::{SortDirection, SortField, SortSpec, sort_transactions};
