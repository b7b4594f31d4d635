//! Aggregate reports over the ledger.
//!
//! The pure grouping and summing functions live in [aggregation]; the
//! [ReportService] fetches the relevant snapshot from the stores and applies
//! them. Absence of data is never an error here: every report has a
//! well-defined zero-valued answer for an empty ledger.

mod aggregation;
mod service;

pub use aggregation::{
    CategoryExpense, MonthlyTotal, balance, expense_by_category, monthly_totals, total_for_type,
    year_window,
};
pub use service::ReportService;
