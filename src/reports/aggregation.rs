//! Pure aggregation over a snapshot of transactions.
//!
//! Provides functions to compute the overall balance, totals per transaction
//! type, the per-category expense breakdown and the zero-filled monthly
//! income/expense series. None of these functions touch a store; they
//! operate on slices fetched by the caller and are safe to call from any
//! number of concurrent requests.

use std::{collections::HashMap, ops::RangeInclusive};

use serde::Serialize;
use time::{Date, Month};

use crate::{
    Error,
    models::{Category, DatabaseID, Transaction, TransactionType},
};

/// The total expenses attributed to a single category, for the per-category
/// breakdown report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryExpense {
    /// The display name of the category.
    pub category: String,
    /// The sum of expense amounts in the category.
    #[serde(rename = "totalExpense")]
    pub total_expense: f64,
}

/// The income and expense totals for a single calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    /// The full English month name, "January" through "December".
    pub month: String,
    /// The sum of income amounts in the month.
    #[serde(rename = "totalIncome")]
    pub total_income: f64,
    /// The sum of expense amounts in the month.
    #[serde(rename = "totalExpense")]
    pub total_expense: f64,
}

/// The calendar-year date range `[Jan 1, Dec 31]` of `year`, used for all
/// year-bounded reports.
///
/// This is the inclusive-date equivalent of the half-open window
/// `[Jan 1 of year, Jan 1 of year + 1)`: a transaction dated Dec 31 of
/// `year` is included, one dated Jan 1 of `year + 1` is not.
///
/// # Errors
/// Returns [Error::InvalidYear] if `year` is outside the supported calendar
/// range.
pub fn year_window(year: i32) -> Result<RangeInclusive<Date>, Error> {
    let start = Date::from_calendar_date(year, Month::January, 1)
        .map_err(|_| Error::InvalidYear(year))?;
    let end = Date::from_calendar_date(year, Month::December, 31)
        .map_err(|_| Error::InvalidYear(year))?;

    Ok(start..=end)
}

/// The overall balance: income minus expenses over all of `transactions`.
///
/// Returns `0.0` for an empty slice.
pub fn balance(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .map(|transaction| match transaction.transaction_type {
            TransactionType::Income => transaction.amount,
            TransactionType::Expense => -transaction.amount,
        })
        .sum()
}

/// The sum of amounts of transactions with `transaction_type`.
///
/// Returns `0.0` when no transaction matches.
pub fn total_for_type(transactions: &[Transaction], transaction_type: TransactionType) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.transaction_type == transaction_type)
        .map(|transaction| transaction.amount)
        .sum()
}

/// Groups expense transactions by category and sums the amounts per group,
/// resolving category IDs to display names.
///
/// Categories with no matching expenses are omitted, not zero-filled (the
/// opposite of [monthly_totals]). A transaction whose category ID does not
/// appear in `categories` is skipped rather than failing the report; the
/// breakdown is advisory, not a ledger of record. Output order is
/// unspecified.
pub fn expense_by_category(
    transactions: &[Transaction],
    categories: &[Category],
) -> Vec<CategoryExpense> {
    let names: HashMap<DatabaseID, &str> = categories
        .iter()
        .map(|category| (category.id, category.name.as_ref()))
        .collect();

    let mut totals: HashMap<DatabaseID, f64> = HashMap::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.transaction_type == TransactionType::Expense)
    {
        *totals.entry(transaction.category_id).or_insert(0.0) += transaction.amount;
    }

    totals
        .into_iter()
        .filter_map(|(category_id, total_expense)| {
            names.get(&category_id).map(|name| CategoryExpense {
                category: name.to_string(),
                total_expense,
            })
        })
        .collect()
}

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Sums income and expense amounts per calendar month.
///
/// Always returns exactly 12 entries ordered January through December, with
/// `0.0` totals for months with no activity. The caller is expected to pass
/// transactions already bounded to a single year.
pub fn monthly_totals(transactions: &[Transaction]) -> Vec<MonthlyTotal> {
    let mut income = [0.0f64; 12];
    let mut expense = [0.0f64; 12];

    for transaction in transactions {
        let index = u8::from(transaction.date.month()) as usize - 1;

        match transaction.transaction_type {
            TransactionType::Income => income[index] += transaction.amount,
            TransactionType::Expense => expense[index] += transaction.amount,
        }
    }

    MONTHS
        .iter()
        .enumerate()
        .map(|(index, month)| MonthlyTotal {
            month: month.to_string(),
            total_income: income[index],
            total_expense: expense[index],
        })
        .collect()
}
