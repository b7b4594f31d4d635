//! Implements a SQLite backed category store.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Category, CategoryName, CategoryPatch, DatabaseID, NewCategory},
    stores::CategoryStore,
};

/// Creates and retrieves transaction categories to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|_| Error::DatabaseLockError)
    }
}

impl CategoryStore for SQLiteCategoryStore {
    /// Create a category in the database.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn create(&self, category: NewCategory) -> Result<Category, Error> {
        let connection = self.connection()?;
        connection.execute(
            "INSERT INTO category (name, color) VALUES (?1, ?2);",
            (category.name.as_ref(), &category.color),
        )?;

        let id = connection.last_insert_rowid();

        Ok(Category {
            id,
            name: category.name,
            color: category.color,
        })
    }

    /// Retrieve the category with `category_id` from the database.
    ///
    /// # Errors
    /// This function will return [Error::NotFound] if `category_id` does not
    /// refer to a valid category, or [Error::SqlError] if there is some
    /// other SQL error.
    fn get(&self, category_id: DatabaseID) -> Result<Category, Error> {
        self.connection()?
            .prepare("SELECT id, name, color FROM category WHERE id = :id;")?
            .query_row(&[(":id", &category_id)], SQLiteCategoryStore::map_row)
            .map_err(|error| error.into())
    }

    /// Retrieve all categories in the database.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get_all(&self) -> Result<Vec<Category>, Error> {
        self.connection()?
            .prepare("SELECT id, name, color FROM category;")?
            .query_map([], SQLiteCategoryStore::map_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }

    /// Apply `patch` to the category with `category_id`.
    ///
    /// Fields left as `None` in the patch keep their current value.
    ///
    /// # Errors
    /// This function will return [Error::NotFound] if `category_id` does not
    /// refer to a valid category, [Error::EmptyCategoryName] if the patch
    /// contains an empty name, or [Error::SqlError] if there is some other
    /// SQL error.
    fn update(&self, category_id: DatabaseID, patch: CategoryPatch) -> Result<Category, Error> {
        let mut category = self.get(category_id)?;

        if let Some(name) = patch.name {
            category.name = CategoryName::new(&name)?;
        }
        if let Some(color) = patch.color {
            category.color = Some(color);
        }

        self.connection()?.execute(
            "UPDATE category SET name = ?1, color = ?2 WHERE id = ?3;",
            (category.name.as_ref(), &category.color, category_id),
        )?;

        Ok(category)
    }

    /// Delete the category with `category_id` from the database.
    ///
    /// # Errors
    /// This function will return [Error::NotFound] if `category_id` does not
    /// refer to a valid category, or [Error::SqlError] if there is some
    /// other SQL error.
    fn delete(&self, category_id: DatabaseID) -> Result<(), Error> {
        let rows_affected = self
            .connection()?
            .execute("DELETE FROM category WHERE id = ?1;", (category_id,))?;

        if rows_affected == 0 {
            Err(Error::NotFound)
        } else {
            Ok(())
        }
    }
}

impl CreateTable for SQLiteCategoryStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                color TEXT
            );",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteCategoryStore {
    type ReturnType = Category;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;

        let raw_name: String = row.get(offset + 1)?;
        let name = CategoryName::new_unchecked(&raw_name);

        let color = row.get(offset + 2)?;

        Ok(Self::ReturnType { id, name, color })
    }
}

#[cfg(test)]
mod category_tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        models::{CategoryName, CategoryPatch, NewCategory},
    };

    use super::{CategoryStore, SQLiteCategoryStore};

    fn get_test_store() -> SQLiteCategoryStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        SQLiteCategoryStore::new(Arc::new(Mutex::new(connection)))
    }

    fn new_category(name: &str) -> NewCategory {
        NewCategory {
            name: CategoryName::new_unchecked(name),
            color: None,
        }
    }

    #[test]
    fn create_category_succeeds() {
        let store = get_test_store();
        let name = CategoryName::new("Categorically a category").unwrap();

        let category = store
            .create(NewCategory {
                name: name.clone(),
                color: Some("#ff8800".to_owned()),
            })
            .unwrap();

        assert!(category.id > 0);
        assert_eq!(category.name, name);
        assert_eq!(category.color.as_deref(), Some("#ff8800"));
    }

    #[test]
    fn get_category_succeeds() {
        let store = get_test_store();
        let inserted_category = store.create(new_category("Foo")).unwrap();

        let selected_category = store.get(inserted_category.id);

        assert_eq!(Ok(inserted_category), selected_category);
    }

    #[test]
    fn get_category_with_invalid_id_returns_not_found() {
        let store = get_test_store();
        let inserted_category = store.create(new_category("Foo")).unwrap();

        let selected_category = store.get(inserted_category.id + 123);

        assert_eq!(selected_category, Err(Error::NotFound));
    }

    #[test]
    fn get_all_categories() {
        let store = get_test_store();

        let inserted_categories = HashSet::from([
            store.create(new_category("Foo")).unwrap(),
            store.create(new_category("Bar")).unwrap(),
        ]);

        let selected_categories = store.get_all().unwrap();
        let selected_categories = HashSet::from_iter(selected_categories);

        assert_eq!(inserted_categories, selected_categories);
    }

    #[test]
    fn update_category_changes_only_patched_fields() {
        let store = get_test_store();
        let category = store
            .create(NewCategory {
                name: CategoryName::new_unchecked("Groceries"),
                color: Some("#00ff00".to_owned()),
            })
            .unwrap();

        let updated = store
            .update(
                category.id,
                CategoryPatch {
                    name: Some("Food".to_owned()),
                    color: None,
                },
            )
            .unwrap();

        assert_eq!(updated.name, CategoryName::new_unchecked("Food"));
        assert_eq!(updated.color.as_deref(), Some("#00ff00"));
        assert_eq!(store.get(category.id), Ok(updated));
    }

    #[test]
    fn update_category_rejects_empty_name() {
        let store = get_test_store();
        let category = store.create(new_category("Groceries")).unwrap();

        let result = store.update(
            category.id,
            CategoryPatch {
                name: Some(String::new()),
                color: None,
            },
        );

        assert_eq!(result, Err(Error::EmptyCategoryName));
    }

    #[test]
    fn update_missing_category_returns_not_found() {
        let store = get_test_store();

        let result = store.update(999, CategoryPatch::default());

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_category_succeeds() {
        let store = get_test_store();
        let category = store.create(new_category("Foo")).unwrap();

        assert_eq!(store.delete(category.id), Ok(()));
        assert_eq!(store.get(category.id), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_category_returns_not_found() {
        let store = get_test_store();

        assert_eq!(store.delete(999), Err(Error::NotFound));
    }
}
