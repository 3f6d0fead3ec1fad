use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// The Store holds the server's shared state: a flat key-value collection
/// backing GET/SET and a nested collection backing HGET/HSET. Each
/// collection sits behind its own reader/writer lock, so readers proceed
/// concurrently and operations on one collection never block the other. The
/// store is designed to be shared and cloned cheaply using reference
/// counting.
#[derive(Clone, Debug, Default)]
pub struct Store {
    inner: Arc<InnerStore>,
}

#[derive(Debug, Default)]
struct InnerStore {
    strings: RwLock<HashMap<String, Bytes>>,
    hashes: RwLock<HashMap<String, HashMap<String, Bytes>>>,
}

impl Store {
    pub fn new() -> Store {
        Store::default()
    }

    /// Overwrites the flat collection entry for `key`. Last write wins.
    pub fn set(&self, key: String, value: Bytes) {
        let mut strings = self.inner.strings.write().unwrap();
        strings.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<Bytes> {
        let strings = self.inner.strings.read().unwrap();
        strings.get(key).cloned()
    }

    /// Overwrites `field` under `key` in the nested collection, creating the
    /// outer entry on its first inner write.
    pub fn hset(&self, key: String, field: String, value: Bytes) {
        let mut hashes = self.inner.hashes.write().unwrap();
        hashes.entry(key).or_default().insert(field, value);
    }

    pub fn hget(&self, key: &str, field: &str) -> Option<Bytes> {
        let hashes = self.inner.hashes.read().unwrap();
        hashes.get(key).and_then(|fields| fields.get(field)).cloned()
    }
}
