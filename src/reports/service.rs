//! The report service: fetches the relevant ledger snapshot from the stores
//! and applies the pure aggregation functions.

use crate::{
    Error,
    models::TransactionType,
    reports::aggregation::{
        CategoryExpense, MonthlyTotal, balance, expense_by_category, monthly_totals,
        total_for_type, year_window,
    },
    stores::{CategoryStore, TransactionQuery, TransactionStore},
};

/// Computes the aggregate reports over the ledger held in a pair of stores.
///
/// The service holds no state of its own; each call fetches a fresh snapshot
/// from the stores, so it may be shared freely between concurrent requests.
#[derive(Debug, Clone)]
pub struct ReportService<T, C> {
    transaction_store: T,
    category_store: C,
}

impl<T: TransactionStore, C: CategoryStore> ReportService<T, C> {
    /// Create a report service reading from the given stores.
    pub fn new(transaction_store: T, category_store: C) -> Self {
        Self {
            transaction_store,
            category_store,
        }
    }

    /// The overall balance over all transactions, `0.0` for an empty ledger.
    pub fn get_balance(&self) -> Result<f64, Error> {
        let transactions = self.transaction_store.get_query(TransactionQuery::default())?;

        Ok(balance(&transactions))
    }

    /// The total income for the calendar year `year`.
    pub fn get_total_income(&self, year: i32) -> Result<f64, Error> {
        self.get_total(year, TransactionType::Income)
    }

    /// The total expenses for the calendar year `year`.
    pub fn get_total_expense(&self, year: i32) -> Result<f64, Error> {
        self.get_total(year, TransactionType::Expense)
    }

    fn get_total(&self, year: i32, transaction_type: TransactionType) -> Result<f64, Error> {
        let transactions = self.transaction_store.get_query(TransactionQuery {
            date_range: Some(year_window(year)?),
            transaction_type: Some(transaction_type),
        })?;

        Ok(total_for_type(&transactions, transaction_type))
    }

    /// The per-category expense breakdown for the calendar year `year`.
    ///
    /// Categories with no expenses in the year are omitted.
    pub fn get_expense_by_category(&self, year: i32) -> Result<Vec<CategoryExpense>, Error> {
        let transactions = self.transaction_store.get_query(TransactionQuery {
            date_range: Some(year_window(year)?),
            transaction_type: Some(TransactionType::Expense),
        })?;
        let categories = self.category_store.get_all()?;

        Ok(expense_by_category(&transactions, &categories))
    }

    /// The monthly income/expense series for the calendar year `year`.
    ///
    /// Always returns 12 entries, January through December, zero-filled for
    /// months with no activity.
    pub fn get_monthly_totals(&self, year: i32) -> Result<Vec<MonthlyTotal>, Error> {
        let transactions = self.transaction_store.get_query(TransactionQuery {
            date_range: Some(year_window(year)?),
            transaction_type: None,
        })?;

        Ok(monthly_totals(&transactions))
    }
}
