use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use super::traits::{EntityStore, EntityWriter};
use crate::{
    entity::{Entity, Value},
    error::StoreError,
    query::{group_key, Predicate},
};

/// Rows held in process; predicates are evaluated per row.
pub struct MemoryStore<E> {
    rows: Arc<RwLock<Vec<E>>>,
}

impl<E> Clone for MemoryStore<E> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
        }
    }
}

impl<E> Default for MemoryStore<E> {
    fn default() -> Self {
        Self::with_rows(Vec::new())
    }
}

impl<E> MemoryStore<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<E>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: Entity> EntityStore<E> for MemoryStore<E> {
    fn grouped_count(
        &self,
        column: &'static str,
        filter: &Predicate<E>,
    ) -> Result<Vec<(Value, i64)>, StoreError> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        let mut groups: HashMap<Value, i64> = HashMap::new();
        for row in rows.iter().filter(|row| filter.matches(row)) {
            *groups.entry(group_key(row, column)).or_insert(0) += 1;
        }
        Ok(groups.into_iter().collect())
    }

    fn count(&self, filter: &Predicate<E>) -> Result<i64, StoreError> {
        let rows = self.rows.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.iter().filter(|row| filter.matches(row)).count() as i64)
    }
}

impl<E: Entity + Clone> EntityWriter<E> for MemoryStore<E> {
    fn save_all(&self, new_rows: &[E]) -> Result<usize, StoreError> {
        let mut rows = self.rows.write().map_err(|_| StoreError::Poisoned)?;
        let pk = E::primary_key().map(|c| c.name);
        for new_row in new_rows {
            let key = pk.and_then(|name| new_row.value_of(name));
            let existing = key.as_ref().and_then(|key| {
                rows.iter()
                    .position(|row| pk.and_then(|name| row.value_of(name)).as_ref() == Some(key))
            });
            match existing {
                Some(idx) => rows[idx] = new_row.clone(),
                None => rows.push(new_row.clone()),
            }
        }
        Ok(new_rows.len())
    }
}
