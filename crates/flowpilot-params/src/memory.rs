//! In-memory parameter store
//!
//! Used by tests and by the `memory` backend of the settings host. It can be
//! switched offline to exercise store-outage paths.

use crate::error::{ParamsError, ParamsResult};
use crate::key::validate_key;
use crate::store::ParamStore;
use crate::value::ParamValue;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Thread-safe map-backed store.
#[derive(Debug)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, ParamValue>>,
    available: AtomicBool,
    writes: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
            writes: AtomicU64::new(0),
        }
    }

    /// Seed a store from a JSON object of key → bool/string/null
    pub fn from_json(json: &str) -> ParamsResult<Self> {
        let seed: HashMap<String, ParamValue> = serde_json::from_str(json)?;
        let store = Self::new();
        for (key, value) in seed {
            store.write(&key, value)?;
        }
        Ok(store)
    }

    /// Simulate the backend going away (or coming back)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
        tracing::debug!("Memory store availability set to {}", available);
    }

    /// Number of successful writes and removals so far
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of keys currently present
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Check if no keys are present
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    fn ensure_available(&self) -> ParamsResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ParamsError::unavailable("memory store is offline"))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamStore for MemoryStore {
    fn read(&self, key: &str) -> ParamsResult<ParamValue> {
        self.ensure_available()?;
        Ok(self.values.read().get(key).cloned().unwrap_or_default())
    }

    fn write(&self, key: &str, value: ParamValue) -> ParamsResult<()> {
        if value.is_absent() {
            return self.remove(key);
        }
        validate_key(key)?;
        self.ensure_available()?;
        self.values.write().insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> ParamsResult<()> {
        validate_key(key)?;
        self.ensure_available()?;
        if self.values.write().remove(key).is_some() {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.read("IsMetric").unwrap(), ParamValue::Absent);

        store.write("IsMetric", ParamValue::Bool(true)).unwrap();
        assert_eq!(store.read("IsMetric").unwrap(), ParamValue::Bool(true));
        assert_eq!(store.len(), 1);

        store.remove("IsMetric").unwrap();
        assert!(store.read("IsMetric").unwrap().is_absent());
        assert!(store.is_empty());
        // Removing again is fine
        store.remove("IsMetric").unwrap();
    }

    #[test]
    fn test_offline_store_fails() {
        let store = MemoryStore::new();
        store.set_available(false);
        assert!(store.read("F3").unwrap_err().is_unavailable());
        assert!(store
            .write("F3", ParamValue::Bool(true))
            .unwrap_err()
            .is_unavailable());

        store.set_available(true);
        store.write("F3", ParamValue::Bool(true)).unwrap();
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_invalid_key_rejected() {
        let store = MemoryStore::new();
        let err = store.write("bad key", ParamValue::Bool(true)).unwrap_err();
        assert!(matches!(err, ParamsError::InvalidKey(_)));
        assert!(matches!(
            store.remove("bad key"),
            Err(ParamsError::InvalidKey(_))
        ));
        assert!(matches!(
            store.write("../escape", ParamValue::Absent),
            Err(ParamsError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_from_json_seed() {
        let store =
            MemoryStore::from_json(r#"{"GitBranch": "master", "IsRHD": true, "Gone": null}"#)
                .unwrap();
        assert_eq!(store.read("GitBranch").unwrap(), ParamValue::text("master"));
        assert_eq!(store.read("IsRHD").unwrap(), ParamValue::Bool(true));
        assert!(store.read("Gone").unwrap().is_absent());
        assert_eq!(store.len(), 2);
    }
}
