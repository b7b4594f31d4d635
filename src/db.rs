/*! This module defines and implements traits for interacting with the
application's SQLite database. */

use rusqlite::{Connection, Row};

use crate::{
    Error,
    stores::sqlite::{SQLiteCategoryStore, SQLiteTransactionStore},
};

/// Create the table for a domain model in the database.
pub trait CreateTable {
    /// Create the table. Does nothing if the table already exists.
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error>;
}

/// Convert a database row into a domain model instance.
pub trait MapRow {
    /// The type that the row is mapped to.
    type ReturnType;

    /// Convert a row into a concrete type, starting from the first column.
    fn map_row(row: &Row) -> Result<Self::ReturnType, rusqlite::Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into a concrete type, starting from the column at
    /// `offset`.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error>;
}

/// Create the tables for the domain models and enable foreign key
/// enforcement on `connection`.
///
/// # Errors
/// Returns an [Error::SqlError] if the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // SQLite does not enforce foreign keys unless asked, and the category
    // reference on transactions relies on it.
    connection.pragma_update(None, "foreign_keys", true)?;

    SQLiteCategoryStore::create_table(connection)?;
    SQLiteTransactionStore::create_table(connection)?;

    Ok(())
}
