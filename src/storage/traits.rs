use std::sync::Arc;

use crate::{entity::Entity, entity::Value, error::StoreError, query::Predicate};

/// Read side of a store holding rows of `E`.
pub trait EntityStore<E: Entity> {
    /// One `(key, count)` pair per distinct value of `column` among the rows
    /// matching `filter`.
    fn grouped_count(
        &self,
        column: &'static str,
        filter: &Predicate<E>,
    ) -> Result<Vec<(Value, i64)>, StoreError>;

    fn count(&self, filter: &Predicate<E>) -> Result<i64, StoreError>;
}

pub trait EntityWriter<E: Entity> {
    /// Insert `rows`, replacing rows with the same primary key. Returns the
    /// number of rows written.
    fn save_all(&self, rows: &[E]) -> Result<usize, StoreError>;
}

impl<E: Entity, S: EntityStore<E> + ?Sized> EntityStore<E> for &S {
    fn grouped_count(
        &self,
        column: &'static str,
        filter: &Predicate<E>,
    ) -> Result<Vec<(Value, i64)>, StoreError> {
        (**self).grouped_count(column, filter)
    }

    fn count(&self, filter: &Predicate<E>) -> Result<i64, StoreError> {
        (**self).count(filter)
    }
}

impl<E: Entity, S: EntityStore<E> + ?Sized> EntityStore<E> for Arc<S> {
    fn grouped_count(
        &self,
        column: &'static str,
        filter: &Predicate<E>,
    ) -> Result<Vec<(Value, i64)>, StoreError> {
        (**self).grouped_count(column, filter)
    }

    fn count(&self, filter: &Predicate<E>) -> Result<i64, StoreError> {
        (**self).count(filter)
    }
}

impl<E: Entity, S: EntityWriter<E> + ?Sized> EntityWriter<E> for &S {
    fn save_all(&self, rows: &[E]) -> Result<usize, StoreError> {
        (**self).save_all(rows)
    }
}

impl<E: Entity, S: EntityWriter<E> + ?Sized> EntityWriter<E> for Arc<S> {
    fn save_all(&self, rows: &[E]) -> Result<usize, StoreError> {
        (**self).save_all(rows)
    }
}
