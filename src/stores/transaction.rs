//! Defines the transaction store trait.

use std::ops::RangeInclusive;

use time::Date;

use crate::{
    Error,
    models::{DatabaseID, NewTransaction, Transaction, TransactionType},
};

/// Handles the creation and retrieval of transactions.
pub trait TransactionStore {
    /// Create a new transaction in the store.
    ///
    /// Implementers must reject negative amounts and category IDs that do
    /// not refer to an existing category.
    fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Retrieve a transaction from the store.
    fn get(&self, id: DatabaseID) -> Result<Transaction, Error>;

    /// Retrieve transactions from the store in the way defined by `query`.
    fn get_query(&self, query: TransactionQuery) -> Result<Vec<Transaction>, Error>;

    /// Replace the transaction with `id` and return the updated transaction.
    fn update(&self, id: DatabaseID, transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Delete the transaction with `id`.
    fn delete(&self, id: DatabaseID) -> Result<(), Error>;
}

/// Defines how transactions should be fetched from
/// [TransactionStore::get_query].
#[derive(Debug, Default, Clone)]
pub struct TransactionQuery {
    /// Include transactions within `date_range` (inclusive).
    pub date_range: Option<RangeInclusive<Date>>,
    /// Include only transactions of this type.
    pub transaction_type: Option<TransactionType>,
}
