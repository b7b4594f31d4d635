//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Row, types::Value};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, NewTransaction, Transaction},
    stores::{TransactionQuery, TransactionStore},
};

/// Creates and retrieves transactions to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new transaction store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|_| Error::DatabaseLockError)
    }

    fn validate(transaction: &NewTransaction) -> Result<(), Error> {
        if transaction.amount < 0.0 {
            return Err(Error::NegativeAmount(transaction.amount));
        }

        Ok(())
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a transaction in the database.
    ///
    /// # Errors
    /// This function will return:
    /// - [Error::NegativeAmount] if `transaction.amount` is negative,
    /// - [Error::InvalidCategory] if `transaction.category_id` does not
    ///   refer to a valid category,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error> {
        Self::validate(&transaction)?;

        let connection = self.connection()?;
        connection.execute(
            "INSERT INTO \"transaction\" (label, description, date, amount, category_id, type)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            (
                &transaction.label,
                &transaction.description,
                &transaction.date,
                transaction.amount,
                transaction.category_id,
                transaction.transaction_type,
            ),
        )?;

        let id = connection.last_insert_rowid();

        Ok(Transaction {
            id,
            label: transaction.label,
            description: transaction.description,
            date: transaction.date,
            amount: transaction.amount,
            category_id: transaction.category_id,
            transaction_type: transaction.transaction_type,
        })
    }

    /// Retrieve the transaction with `id` from the database.
    ///
    /// # Errors
    /// This function will return [Error::NotFound] if `id` does not refer to
    /// a valid transaction, or [Error::SqlError] if there is some other SQL
    /// error.
    fn get(&self, id: DatabaseID) -> Result<Transaction, Error> {
        self.connection()?
            .prepare(
                "SELECT id, label, description, date, amount, category_id, type
                    FROM \"transaction\" WHERE id = :id;",
            )?
            .query_row(&[(":id", &id)], SQLiteTransactionStore::map_row)
            .map_err(|error| error.into())
    }

    /// Retrieve transactions matching `query` from the database.
    ///
    /// An empty vector is returned when no transactions match.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get_query(&self, query: TransactionQuery) -> Result<Vec<Transaction>, Error> {
        let mut sql = String::from(
            "SELECT id, label, description, date, amount, category_id, type FROM \"transaction\"",
        );
        let mut clauses: Vec<&str> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        if let Some(date_range) = &query.date_range {
            // Dates are stored as ISO-8601 text, so the lexicographic
            // comparison below matches the calendar order.
            clauses.push("date >= ?");
            clauses.push("date <= ?");
            params.push(Value::Text(date_range.start().to_string()));
            params.push(Value::Text(date_range.end().to_string()));
        }

        if let Some(transaction_type) = query.transaction_type {
            clauses.push("type = ?");
            params.push(Value::Text(transaction_type.as_str().to_owned()));
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        sql.push(';');

        self.connection()?
            .prepare(&sql)?
            .query_map(
                rusqlite::params_from_iter(params),
                SQLiteTransactionStore::map_row,
            )?
            .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
            .collect()
    }

    /// Replace the transaction with `id` in the database.
    ///
    /// # Errors
    /// This function will return [Error::NotFound] if `id` does not refer to
    /// a valid transaction, the same validation errors as
    /// [SQLiteTransactionStore::create], or [Error::SqlError] if there is
    /// some other SQL error.
    fn update(&self, id: DatabaseID, transaction: NewTransaction) -> Result<Transaction, Error> {
        Self::validate(&transaction)?;

        let rows_affected = self.connection()?.execute(
            "UPDATE \"transaction\"
                SET label = ?1, description = ?2, date = ?3, amount = ?4,
                    category_id = ?5, type = ?6
                WHERE id = ?7;",
            (
                &transaction.label,
                &transaction.description,
                &transaction.date,
                transaction.amount,
                transaction.category_id,
                transaction.transaction_type,
                id,
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(Transaction {
            id,
            label: transaction.label,
            description: transaction.description,
            date: transaction.date,
            amount: transaction.amount,
            category_id: transaction.category_id,
            transaction_type: transaction.transaction_type,
        })
    }

    /// Delete the transaction with `id` from the database.
    ///
    /// # Errors
    /// This function will return [Error::NotFound] if `id` does not refer to
    /// a valid transaction, or [Error::SqlError] if there is some other SQL
    /// error.
    fn delete(&self, id: DatabaseID) -> Result<(), Error> {
        let rows_affected = self
            .connection()?
            .execute("DELETE FROM \"transaction\" WHERE id = ?1;", (id,))?;

        if rows_affected == 0 {
            Err(Error::NotFound)
        } else {
            Ok(())
        }
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                label TEXT,
                description TEXT,
                date TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount >= 0),
                category_id INTEGER NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE
            );",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Self::ReturnType {
            id: row.get(offset)?,
            label: row.get(offset + 1)?,
            description: row.get(offset + 2)?,
            date: row.get(offset + 3)?,
            amount: row.get(offset + 4)?,
            category_id: row.get(offset + 5)?,
            transaction_type: row.get(offset + 6)?,
        })
    }
}

#[cfg(test)]
mod transaction_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        models::{CategoryName, DatabaseID, NewCategory, NewTransaction, TransactionType},
        stores::{CategoryStore, TransactionQuery, sqlite::SQLiteCategoryStore},
    };

    use super::{SQLiteTransactionStore, TransactionStore};

    fn get_test_store() -> (SQLiteTransactionStore, DatabaseID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let connection = Arc::new(Mutex::new(connection));

        let category = SQLiteCategoryStore::new(connection.clone())
            .create(NewCategory {
                name: CategoryName::new_unchecked("Groceries"),
                color: None,
            })
            .unwrap();

        (SQLiteTransactionStore::new(connection), category.id)
    }

    fn new_transaction(category_id: DatabaseID) -> NewTransaction {
        NewTransaction {
            label: Some("Weekly shop".to_owned()),
            description: None,
            date: date!(2024 - 01 - 05),
            amount: 123.45,
            category_id,
            transaction_type: TransactionType::Expense,
        }
    }

    #[test]
    fn create_transaction_succeeds() {
        let (store, category_id) = get_test_store();

        let transaction = store.create(new_transaction(category_id)).unwrap();

        assert!(transaction.id > 0);
        assert_eq!(transaction.amount, 123.45);
        assert_eq!(transaction.category_id, category_id);
        assert_eq!(transaction.transaction_type, TransactionType::Expense);
    }

    #[test]
    fn create_transaction_fails_on_negative_amount() {
        let (store, category_id) = get_test_store();

        let result = store.create(NewTransaction {
            amount: -1.0,
            ..new_transaction(category_id)
        });

        assert_eq!(result, Err(Error::NegativeAmount(-1.0)));
    }

    #[test]
    fn create_transaction_fails_on_invalid_category_id() {
        let (store, category_id) = get_test_store();

        let result = store.create(NewTransaction {
            category_id: category_id + 123,
            ..new_transaction(category_id)
        });

        assert_eq!(result, Err(Error::InvalidCategory));
    }

    #[test]
    fn get_transaction_succeeds() {
        let (store, category_id) = get_test_store();
        let inserted = store.create(new_transaction(category_id)).unwrap();

        let selected = store.get(inserted.id);

        assert_eq!(Ok(inserted), selected);
    }

    #[test]
    fn get_transaction_with_invalid_id_returns_not_found() {
        let (store, category_id) = get_test_store();
        let inserted = store.create(new_transaction(category_id)).unwrap();

        let selected = store.get(inserted.id + 123);

        assert_eq!(selected, Err(Error::NotFound));
    }

    #[test]
    fn get_query_returns_all_transactions_by_default() {
        let (store, category_id) = get_test_store();
        store.create(new_transaction(category_id)).unwrap();
        store.create(new_transaction(category_id)).unwrap();

        let transactions = store.get_query(TransactionQuery::default()).unwrap();

        assert_eq!(transactions.len(), 2);
    }

    #[test]
    fn get_query_filters_by_date_range() {
        let (store, category_id) = get_test_store();
        let in_range = store
            .create(NewTransaction {
                date: date!(2024 - 06 - 15),
                ..new_transaction(category_id)
            })
            .unwrap();
        store
            .create(NewTransaction {
                date: date!(2023 - 12 - 31),
                ..new_transaction(category_id)
            })
            .unwrap();
        store
            .create(NewTransaction {
                date: date!(2025 - 01 - 01),
                ..new_transaction(category_id)
            })
            .unwrap();

        let transactions = store
            .get_query(TransactionQuery {
                date_range: Some(date!(2024 - 01 - 01)..=date!(2024 - 12 - 31)),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(transactions, vec![in_range]);
    }

    #[test]
    fn get_query_filters_by_type() {
        let (store, category_id) = get_test_store();
        store.create(new_transaction(category_id)).unwrap();
        let income = store
            .create(NewTransaction {
                transaction_type: TransactionType::Income,
                ..new_transaction(category_id)
            })
            .unwrap();

        let transactions = store
            .get_query(TransactionQuery {
                transaction_type: Some(TransactionType::Income),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(transactions, vec![income]);
    }

    #[test]
    fn update_transaction_succeeds() {
        let (store, category_id) = get_test_store();
        let inserted = store.create(new_transaction(category_id)).unwrap();

        let updated = store
            .update(
                inserted.id,
                NewTransaction {
                    amount: 99.0,
                    ..new_transaction(category_id)
                },
            )
            .unwrap();

        assert_eq!(updated.amount, 99.0);
        assert_eq!(store.get(inserted.id), Ok(updated));
    }

    #[test]
    fn update_missing_transaction_returns_not_found() {
        let (store, category_id) = get_test_store();

        let result = store.update(999, new_transaction(category_id));

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_transaction_succeeds() {
        let (store, category_id) = get_test_store();
        let inserted = store.create(new_transaction(category_id)).unwrap();

        assert_eq!(store.delete(inserted.id), Ok(()));
        assert_eq!(store.get(inserted.id), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_transaction_returns_not_found() {
        let (store, _) = get_test_store();

        assert_eq!(store.delete(999), Err(Error::NotFound));
    }
}
