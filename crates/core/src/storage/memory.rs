use std::collections::BTreeSet;

use dashmap::DashMap;

use crate::dht::TableRow;
use crate::error::Error;
use crate::error::Result;

/// Multi-valued in-memory bindings: every key maps to a set of values.
/// A key with no value left is dropped.
#[derive(Debug, Default)]
pub struct MemStorage {
    table: DashMap<String, BTreeSet<String>>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            table: DashMap::default(),
        }
    }

    /// All values bound under `key`, empty if none.
    pub fn get(&self, key: &str) -> Vec<String> {
        self.table
            .get(key)
            .map(|v| v.value().iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Bind `value` under `key`. Adding an existing binding is a no-op.
    pub fn add(&self, key: &str, value: &str) {
        self.table
            .entry(key.to_string())
            .or_default()
            .insert(value.to_string());
    }

    /// Remove one binding, fails with [Error::Invalid] if it is absent.
    pub fn delete(&self, key: &str, value: &str) -> Result<()> {
        let removed = match self.table.get_mut(key) {
            Some(mut vals) => vals.remove(value),
            None => false,
        };
        if !removed {
            return Err(Error::invalid(format!(
                "no binding of {value} under {key}"
            )));
        }
        self.table.remove_if(key, |_, vals| vals.is_empty());
        Ok(())
    }

    /// Snapshot of all bindings, ordered by key.
    pub fn get_all(&self) -> Vec<TableRow> {
        let mut rows: Vec<TableRow> = self
            .table
            .iter()
            .map(|e| TableRow::new(e.key().clone(), e.value().iter().cloned().collect()))
            .collect();
        rows.sort_by(|a, b| a.key.cmp(&b.key));
        rows
    }

    /// Remove and return every binding whose key matches `f`.
    pub fn extract<F>(&self, f: F) -> Vec<TableRow>
    where F: Fn(&str) -> bool {
        let keys: Vec<String> = self
            .table
            .iter()
            .filter(|e| f(e.key()))
            .map(|e| e.key().clone())
            .collect();
        let mut rows: Vec<TableRow> = keys
            .into_iter()
            .filter_map(|k| self.table.remove(&k))
            .map(|(k, vals)| TableRow::new(k, vals.into_iter().collect()))
            .collect();
        rows.sort_by(|a, b| a.key.cmp(&b.key));
        rows
    }

    /// Merge rows into the store.
    pub fn install(&self, rows: Vec<TableRow>) {
        for row in rows {
            let mut entry = self.table.entry(row.key).or_default();
            entry.extend(row.vals);
        }
        self.table.retain(|_, vals| !vals.is_empty());
    }

    /// Number of keys.
    pub fn count(&self) -> usize {
        self.table.len()
    }
}
