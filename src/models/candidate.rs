//! The candidate transaction produced by receipt ingestion.

use serde::{Deserialize, Serialize};
use time::Date;

/// A transaction extracted from a scanned receipt, awaiting human review.
///
/// The shape mirrors [crate::models::Transaction] except that `category` is
/// an unresolved free-text label rather than a category ID, and the record
/// is never persisted by the ingestion pipeline. Fields the extraction
/// service failed to produce are left empty (or `0.0`/`None`) rather than
/// failing the whole upload, since the result is always reviewed before it
/// is promoted to a real transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateTransaction {
    /// A short label for the expense.
    pub label: String,
    /// A short description of the expense.
    pub description: String,
    /// The date printed on the receipt, if one could be parsed.
    pub date: Option<Date>,
    /// The total amount on the receipt. `0.0` when it could not be parsed.
    pub amount: f64,
    /// The currency of the amount.
    pub currency: String,
    /// A suggested category as free text, not yet mapped to a category ID.
    pub category: String,
    /// The name of the store or merchant.
    pub business: String,
}
