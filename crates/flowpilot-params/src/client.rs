//! Parameter Store Client
//!
//! Typed accessor over a [`ParamStore`]. Unguarded getters fail with
//! `KeyNotFound` for absent keys; UI code is expected to use the guarded
//! `*_or` variants, which check existence first and fall back to a default.

use crate::error::{ParamsError, ParamsResult};
use crate::key::ParamKey;
use crate::store::ParamStore;
use crate::value::ParamValue;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Cheaply cloneable handle to a parameter store.
#[derive(Clone)]
pub struct Params {
    store: Arc<dyn ParamStore>,
}

impl Params {
    /// Wrap a store
    pub fn new(store: impl ParamStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Wrap an already shared store
    pub fn from_shared(store: Arc<dyn ParamStore>) -> Self {
        Self { store }
    }

    /// Name of the backing store
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// True iff a value has been written for `key`. Never fails.
    pub fn exists(&self, key: &str) -> bool {
        match self.store.read(key) {
            Ok(value) => !value.is_absent(),
            Err(e) => {
                tracing::warn!("Existence check for {} failed: {}", key, e);
                false
            }
        }
    }

    /// Raw value of `key`
    pub fn get(&self, key: &str) -> ParamsResult<ParamValue> {
        self.store.read(key)
    }

    /// Text value of `key`; booleans read as `"1"`/`"0"`
    pub fn get_string(&self, key: &str) -> ParamsResult<String> {
        self.store
            .read(key)?
            .as_text()
            .ok_or_else(|| ParamsError::KeyNotFound(key.to_string()))
    }

    /// Boolean value of `key`
    pub fn get_bool(&self, key: &str) -> ParamsResult<bool> {
        let value = self.store.read(key)?;
        if value.is_absent() {
            return Err(ParamsError::KeyNotFound(key.to_string()));
        }
        value.as_bool().ok_or_else(|| ParamsError::TypeMismatch {
            key: key.to_string(),
            expected: "bool",
            found: value.to_string(),
        })
    }

    /// `exists(key) ? get_string(key) : default`
    pub fn get_string_or(&self, key: &str, default: &str) -> String {
        if !self.exists(key) {
            return default.to_string();
        }
        match self.get_string(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Falling back to default for {}: {}", key, e);
                default.to_string()
            }
        }
    }

    /// `exists(key) ? get_bool(key) : default`
    pub fn get_bool_or(&self, key: &str, default: bool) -> bool {
        if !self.exists(key) {
            return default;
        }
        match self.get_bool(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Falling back to default for {}: {}", key, e);
                default
            }
        }
    }

    /// True iff `key` exists and decodes to `expected`
    pub fn exists_and_compare(&self, key: &str, expected: bool) -> bool {
        self.exists(key) && self.get_bool(key).map(|v| v == expected).unwrap_or(false)
    }

    /// Upsert a boolean
    pub fn put_bool(&self, key: &str, value: bool) -> ParamsResult<()> {
        self.put(key, ParamValue::Bool(value))
    }

    /// Upsert a string
    pub fn put_string(&self, key: &str, value: &str) -> ParamsResult<()> {
        self.put(key, ParamValue::text(value))
    }

    /// Upsert a raw value; `Absent` removes the key
    pub fn put(&self, key: &str, value: ParamValue) -> ParamsResult<()> {
        tracing::debug!("put {} = {}", key, value);
        self.store.write(key, value)
    }

    /// Delete `key`
    pub fn remove(&self, key: &str) -> ParamsResult<()> {
        self.store.remove(key)
    }

    /// Current values of `keys`, absent ones included
    pub fn snapshot(&self, keys: &[ParamKey]) -> ParamsResult<BTreeMap<String, ParamValue>> {
        keys.iter()
            .map(|key| Ok((key.to_string(), self.store.read(key.as_str())?)))
            .collect()
    }
}

impl fmt::Debug for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Params")
            .field("backend", &self.store.backend_name())
            .finish()
    }
}
