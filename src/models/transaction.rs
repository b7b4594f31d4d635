//! This file defines the type `Transaction`, the core type of the ledger,
//! and the closed set of transaction types.

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::models::DatabaseID;

/// Whether a transaction brings money in or takes money out.
///
/// This is a closed enumeration: the stored amount is always a non-negative
/// magnitude and the direction of the money flow is carried here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    /// The string representation used in the database and the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(FromSqlError::Other(
                format!("invalid transaction type {other:?}").into(),
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or
/// earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseID,
    /// A short label, e.g. "Weekly shop".
    pub label: Option<String>,
    /// A longer text description of what the transaction was for.
    pub description: Option<String>,
    /// When the transaction happened.
    pub date: Date,
    /// The amount of money spent or earned. Never negative at rest.
    pub amount: f64,
    /// The category the transaction belongs to.
    #[serde(rename = "category")]
    pub category_id: DatabaseID,
    /// Whether this is income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

/// The data needed to create a new [Transaction].
///
/// The store validates that `amount` is non-negative and that `category_id`
/// refers to an existing category before writing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// A short label for the transaction.
    pub label: Option<String>,
    /// A longer text description.
    pub description: Option<String>,
    /// When the transaction happened.
    pub date: Date,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// The category the transaction belongs to.
    #[serde(rename = "category")]
    pub category_id: DatabaseID,
    /// Whether this is income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}
