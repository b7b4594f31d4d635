//! Implements a struct that holds the state shared by the API handlers.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use rusqlite::Connection;

use crate::{
    Error,
    db::initialize,
    extraction::ExtractionClient,
    ingest::IngestionPipeline,
    stores::sqlite::{SQLiteCategoryStore, SQLiteTransactionStore},
};

/// The state of the REST server: the stores over the shared SQLite
/// connection and the receipt ingestion pipeline.
#[derive(Clone)]
pub struct AppState {
    /// The store for transaction categories.
    pub category_store: SQLiteCategoryStore,

    /// The store for transactions.
    pub transaction_store: SQLiteTransactionStore,

    /// The receipt ingestion pipeline.
    pub pipeline: IngestionPipeline,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection and an
    /// extraction client for receipt scanning.
    ///
    /// This function will initialize the database by adding the tables for
    /// the domain models. `extraction_timeout` bounds how long a single
    /// receipt extraction may take.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        extraction_client: Arc<dyn ExtractionClient>,
        extraction_timeout: Duration,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            category_store: SQLiteCategoryStore::new(connection.clone()),
            transaction_store: SQLiteTransactionStore::new(connection),
            pipeline: IngestionPipeline::new(extraction_client, extraction_timeout),
        })
    }
}
