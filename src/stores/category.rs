//! Defines the category store trait.

use crate::{
    Error,
    models::{Category, CategoryPatch, DatabaseID, NewCategory},
};

/// Handles the creation and retrieval of transaction categories.
pub trait CategoryStore {
    /// Create a new category and add it to the store.
    fn create(&self, category: NewCategory) -> Result<Category, Error>;

    /// Get a category by its ID.
    fn get(&self, category_id: DatabaseID) -> Result<Category, Error>;

    /// Get all categories.
    fn get_all(&self) -> Result<Vec<Category>, Error>;

    /// Apply `patch` to the category with `category_id` and return the
    /// updated category.
    fn update(&self, category_id: DatabaseID, patch: CategoryPatch) -> Result<Category, Error>;

    /// Delete the category with `category_id`.
    fn delete(&self, category_id: DatabaseID) -> Result<(), Error>;
}
