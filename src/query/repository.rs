use std::marker::PhantomData;

use super::{group_and_count, GroupCountResult, Predicate};
use crate::{
    entity::{Entity, FieldSelector, FieldValue},
    error::{CoercionError, QueryError},
    storage::{EntityStore, EntityWriter},
};

/// Query surface for one entity type over one store handle.
pub struct Repository<E, S> {
    store: S,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S: Clone> Clone for Repository<E, S> {
    fn clone(&self) -> Self {
        Self::new(self.store.clone())
    }
}

impl<E, S> Repository<E, S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<E: Entity, S: EntityStore<E>> Repository<E, S> {
    pub fn group_and_count<V: FieldValue>(
        &self,
        selector: &FieldSelector<E, V>,
        filter: &Predicate<E>,
    ) -> Result<GroupCountResult<V>, QueryError> {
        group_and_count(&self.store, selector, filter)
    }

    pub fn count(&self, filter: &Predicate<E>) -> Result<u64, QueryError> {
        filter.validate()?;
        let count = self.store.count(filter)?;
        let count =
            u64::try_from(count).map_err(|_| CoercionError::new("non-negative count", count))?;
        Ok(count)
    }
}

impl<E: Entity, S: EntityWriter<E>> Repository<E, S> {
    /// Insert or replace `rows` by primary key.
    pub fn save_all(&self, rows: &[E]) -> Result<usize, QueryError> {
        let saved = self.store.save_all(rows)?;
        log::debug!("saved {} rows into {}", saved, E::TABLE);
        Ok(saved)
    }
}
