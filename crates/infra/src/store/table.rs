//! Generic in-memory table with sequence-assigned integer keys.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{StoreError, StoreResult};

#[derive(Debug)]
struct TableState<V> {
    rows: BTreeMap<i64, V>,
    last_id: i64,
}

/// Ordered in-memory table for tests/dev.
///
/// Rows are keyed by an id drawn from a monotonically increasing sequence, so
/// iteration order is insertion order.
#[derive(Debug)]
pub struct InMemoryTable<V> {
    inner: RwLock<TableState<V>>,
}

impl<V> InMemoryTable<V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(TableState {
                rows: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }
}

impl<V> Default for InMemoryTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> InMemoryTable<V> {
    /// Reserve the next id and store the row built for it.
    pub fn insert_with(&self, build: impl FnOnce(i64) -> V) -> StoreResult<V> {
        let mut state = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        state.last_id += 1;
        let id = state.last_id;
        let row = build(id);
        state.rows.insert(id, row.clone());
        Ok(row)
    }

    pub fn get(&self, id: i64) -> StoreResult<Option<V>> {
        let state = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(state.rows.get(&id).cloned())
    }

    /// Rows satisfying `pred`, ascending by id.
    pub fn select(&self, pred: impl Fn(&V) -> bool) -> StoreResult<Vec<V>> {
        let state = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(state.rows.values().filter(|v| pred(v)).cloned().collect())
    }

    pub fn update_with(&self, id: i64, f: impl FnOnce(&mut V)) -> StoreResult<Option<V>> {
        let mut state = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(state.rows.get_mut(&id).map(|row| {
            f(row);
            row.clone()
        }))
    }

    pub fn delete(&self, id: i64) -> StoreResult<bool> {
        let mut state = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(state.rows.remove(&id).is_some())
    }

    #[cfg(test)]
    pub fn len(&self) -> StoreResult<usize> {
        let state = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(state.rows.len())
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one_and_are_not_reused() {
        let table: InMemoryTable<(i64, &str)> = InMemoryTable::new();
        let a = table.insert_with(|id| (id, "a")).unwrap();
        let b = table.insert_with(|id| (id, "b")).unwrap();
        assert_eq!((a.0, b.0), (1, 2));

        assert!(table.delete(2).unwrap());
        let c = table.insert_with(|id| (id, "c")).unwrap();
        assert_eq!(c.0, 3);
        assert_eq!(table.len().unwrap(), 2);
    }

    #[test]
    fn select_returns_rows_in_id_order() {
        let table: InMemoryTable<(i64, u8)> = InMemoryTable::new();
        for n in 0..5u8 {
            table.insert_with(|id| (id, n % 2)).unwrap();
        }
        let odd = table.select(|(_, n)| *n == 1).unwrap();
        assert_eq!(odd.iter().map(|(id, _)| *id).collect::<Vec<_>>(), vec![2, 4]);
    }

    #[test]
    fn update_and_delete_unknown_ids() {
        let table: InMemoryTable<i64> = InMemoryTable::new();
        assert!(table.update_with(9, |v| *v += 1).unwrap().is_none());
        assert!(!table.delete(9).unwrap());
        assert!(table.is_empty().unwrap());
    }
}
