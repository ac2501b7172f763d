// Memoizing resource cache

use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

/// Memoizing cache for one resource category
///
/// A key's loader runs at most once per successful load. Failed loads are
/// not stored, so the next request for that key retries. Entries live until
/// the cache is dropped.
#[derive(Debug)]
pub struct ResourceCache<K, T> {
    entries: HashMap<K, Rc<T>>,
    /// Number of successful loader invocations
    loads: usize,
}

impl<K, T> ResourceCache<K, T>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            loads: 0,
        }
    }

    /// Return the cached resource for `key`, loading it on a miss
    pub fn get_or_load<E, F>(&mut self, key: K, loader: F) -> Result<Rc<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(resource) = self.entries.get(&key) {
            return Ok(Rc::clone(resource));
        }

        let resource = Rc::new(loader()?);
        self.loads += 1;
        self.entries.insert(key, Rc::clone(&resource));
        Ok(resource)
    }

    /// Get a cached resource without loading
    pub fn get(&self, key: &K) -> Option<Rc<T>> {
        self.entries.get(key).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of times a loader has run successfully
    pub fn loads(&self) -> usize {
        self.loads
    }
}

impl<K, T> Default for ResourceCache<K, T>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
