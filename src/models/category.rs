//! This file defines the `Category` type and the types needed to create and
//! update a category. A category groups transactions for reporting, e.g.,
//! 'Groceries', 'Rent', 'Wages'.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, models::DatabaseID};

/// The name of a category.
///
/// Names are not required to be unique; that policy is left to the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// This function will return an error if `name` is an empty string.
    pub fn new(name: &str) -> Result<Self, Error> {
        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`,
    /// because violating the non-empty invariant causes incorrect behaviour
    /// but does not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category for expenses and income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID of the category.
    pub id: DatabaseID,
    /// The name of the category.
    pub name: CategoryName,
    /// An optional display colour, e.g. "#ff8800".
    pub color: Option<String>,
}

/// The data needed to create a new [Category].
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    /// The name of the category.
    pub name: CategoryName,
    /// An optional display colour.
    pub color: Option<String>,
}

/// A partial update to a [Category]. Fields left as `None` are unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CategoryPatch {
    /// The new name, if it should change.
    pub name: Option<String>,
    /// The new colour, if it should change.
    pub color: Option<String>,
}
