use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A row type stored in a [`Table`].
pub trait Record: Clone {
    /// Human readable name used in error messages.
    const LABEL: &'static str;

    fn id(&self) -> i64;
    fn assign_id(&mut self, id: i64);
}

/// Rows keyed by a store-assigned, monotonically increasing id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T: Record> Table<T> {
    pub fn insert(&mut self, mut row: T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        row.assign_id(id);
        self.rows.insert(id, row.clone());
        row
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.rows.get(&id)
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    pub fn require(&self, id: i64) -> Result<&T, StoreError> {
        self.rows.get(&id).ok_or(StoreError::NotFound { label: T::LABEL, id })
    }

    pub fn require_mut(&mut self, id: i64) -> Result<&mut T, StoreError> {
        self.rows.get_mut(&id).ok_or(StoreError::NotFound { label: T::LABEL, id })
    }

    pub fn contains(&self, id: i64) -> bool {
        self.rows.contains_key(&id)
    }

    /// Overwrites an existing row in place; the row keeps its id.
    pub fn replace(&mut self, row: T) -> Result<(), StoreError> {
        let slot = self.require_mut(row.id())?;
        *slot = row;
        Ok(())
    }

    pub fn remove(&mut self, id: i64) -> Result<T, StoreError> {
        self.rows.remove(&id).ok_or(StoreError::NotFound { label: T::LABEL, id })
    }

    /// Removes every row matching `predicate`, returning the removed ids.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> Vec<i64>
    where
        F: FnMut(&T) -> bool,
    {
        let doomed: Vec<i64> = self
            .rows
            .iter()
            .filter(|(_, row)| predicate(row))
            .map(|(id, _)| *id)
            .collect();

        for id in &doomed {
            self.rows.remove(id);
        }

        doomed
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.rows.values_mut()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
