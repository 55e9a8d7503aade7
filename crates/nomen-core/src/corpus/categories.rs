//! # Category Table
//!
//! Bidirectional category name ↔ index mapping. Indices are dense,
//! start at 0, and follow first-seen order. The table is built once while
//! loading and is read-only to everything outside this crate.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{NomenError, Result};

/// Category names indexed by id, plus the reverse lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Categories {
    names: Vec<String>,
    by_name: HashMap<String, usize>,
}

impl Categories {
    /// Build a table from names already in index order.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut categories = Self::default();
        for name in names {
            let name = name.into();
            if categories.by_name.contains_key(&name) {
                return Err(NomenError::DuplicateCategory(name));
            }
            categories.register(&name);
        }
        Ok(categories)
    }

    /// Index of `name`, assigning the next free one on first sight.
    pub(crate) fn register(&mut self, name: &str) -> usize {
        if let Some(&index) = self.by_name.get(name) {
            return index;
        }
        let index = self.names.len();
        self.names.push(name.to_string());
        self.by_name.insert(name.to_string(), index);
        index
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no category has been registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name registered at `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Name registered at `index`, as an error when absent.
    pub fn try_name(&self, index: usize) -> Result<&str> {
        self.name(index).ok_or(NomenError::UnknownCategory(index))
    }

    /// Index registered for `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Names in index order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The name → index lookup.
    pub fn index_map(&self) -> &HashMap<String, usize> {
        &self.by_name
    }

    /// `(index, name)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.names.iter().map(String::as_str).enumerate()
    }
}

impl TryFrom<Vec<String>> for Categories {
    type Error = NomenError;

    fn try_from(names: Vec<String>) -> Result<Self> {
        Self::from_names(names)
    }
}

impl From<Categories> for Vec<String> {
    fn from(categories: Categories) -> Self {
        categories.names
    }
}
