//! The domain models: categories, transactions and the unsaved candidate
//! transaction produced by receipt ingestion.

mod candidate;
mod category;
mod transaction;

pub use candidate::CandidateTransaction;
pub use category::{Category, CategoryName, CategoryPatch, NewCategory};
pub use transaction::{NewTransaction, Transaction, TransactionType};

/// Alias for the integer type used for database row IDs.
pub type DatabaseID = i64;
