use std::{
    collections::{hash_map, HashMap},
    hash::Hash,
};

use serde::Serialize;

use super::Predicate;
use crate::{
    entity::{Entity, FieldSelector, FieldValue, Value},
    error::{CoercionError, QueryError},
    storage::EntityStore,
};

/// Row count per distinct grouping-key value.
///
/// Keys with no matching rows are absent rather than mapped to zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GroupCountResult<V: Eq + Hash> {
    counts: HashMap<V, u64>,
}

impl<V: Eq + Hash> GroupCountResult<V> {
    pub fn get(&self, key: &V) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, V, u64> {
        self.counts.iter()
    }

    pub fn into_inner(self) -> HashMap<V, u64> {
        self.counts
    }
}

impl<V: FieldValue> GroupCountResult<V> {
    /// Coerce raw `(key, count)` rows. A key seen twice keeps its last count.
    pub fn from_rows(rows: Vec<(Value, i64)>) -> Result<Self, CoercionError> {
        let mut counts = HashMap::with_capacity(rows.len());
        for (key, count) in rows {
            let count = u64::try_from(count)
                .map_err(|_| CoercionError::new("non-negative count", count))?;
            counts.insert(V::from_value(key)?, count);
        }
        Ok(Self { counts })
    }
}

impl<V: Eq + Hash> From<HashMap<V, u64>> for GroupCountResult<V> {
    fn from(counts: HashMap<V, u64>) -> Self {
        Self { counts }
    }
}

impl<V: Eq + Hash> FromIterator<(V, u64)> for GroupCountResult<V> {
    fn from_iter<I: IntoIterator<Item = (V, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

impl<V: Eq + Hash> IntoIterator for GroupCountResult<V> {
    type Item = (V, u64);
    type IntoIter = hash_map::IntoIter<V, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.into_iter()
    }
}

impl<'a, V: Eq + Hash> IntoIterator for &'a GroupCountResult<V> {
    type Item = (&'a V, &'a u64);
    type IntoIter = hash_map::Iter<'a, V, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.iter()
    }
}

/// Group the rows of `E` matching `filter` by `selector` and count each group.
///
/// Selector and predicate are checked against `E`'s columns before the store
/// is touched; the store then runs exactly one aggregation.
pub fn group_and_count<E, V, S>(
    store: &S,
    selector: &FieldSelector<E, V>,
    filter: &Predicate<E>,
) -> Result<GroupCountResult<V>, QueryError>
where
    E: Entity,
    V: FieldValue,
    S: EntityStore<E> + ?Sized,
{
    let column = selector.resolve()?;
    filter.validate()?;

    let span = tracing::debug_span!("group_and_count", table = E::TABLE, column = column.name);
    let _guard = span.enter();

    log::debug!("grouping {} by {} where {}", E::TABLE, column.name, filter);
    let rows = store.grouped_count(column.name, filter)?;
    let result = GroupCountResult::from_rows(rows)?;
    log::debug!(
        "{} groups, {} rows in {}",
        result.len(),
        result.total(),
        E::TABLE
    );
    Ok(result)
}
