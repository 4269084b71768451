//! Insertion-ordered key/value store with linear-scan lookup.
//!
//! Duplicate keys are not deduplicated: both entries coexist and lookup
//! returns the earliest match. O(n) scans are fine for the small bounded
//! key sets this backs (registry entries, per-layout ids, named
//! resources).

#[derive(Debug)]
pub struct KvStore<V> {
    entries: Vec<(String, V)>,
}

impl<V> KvStore<V> {
    pub fn new() -> Self {
        KvStore { entries: Vec::new() }
    }

    /// Append an entry. An existing entry under the same key is kept;
    /// it continues to win on lookup.
    pub fn put(&mut self, key: impl Into<String>, value: V) {
        self.entries.push((key.into(), value));
    }

    /// First entry matching `key`, in insertion order.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Remove and return the first entry matching `key`.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V> Default for KvStore<V> {
    fn default() -> Self {
        KvStore::new()
    }
}
