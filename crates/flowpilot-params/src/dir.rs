//! Directory-backed parameter store
//!
//! Each key is a file directly under the root directory whose contents are
//! the raw value bytes. This is the layout shared with the rest of the
//! dashboard, so writes must be atomic: a temp file in the same directory is
//! written, synced and renamed over the key file.

use crate::error::{ParamsError, ParamsResult};
use crate::key::{is_valid_key, validate_key};
use crate::store::ParamStore;
use crate::value::ParamValue;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Store that keeps one file per key.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> ParamsResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            ParamsError::unavailable(format!("cannot create {}: {}", root.display(), e))
        })?;
        tracing::debug!("Opened parameter directory {}", root.display());
        Ok(Self { root })
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn ensure_root(&self) -> ParamsResult<()> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(ParamsError::unavailable(format!(
                "parameter directory {} is missing",
                self.root.display()
            )))
        }
    }
}

impl ParamStore for DirStore {
    fn read(&self, key: &str) -> ParamsResult<ParamValue> {
        if !is_valid_key(key) {
            return Ok(ParamValue::Absent);
        }
        match fs::read(self.key_path(key)) {
            Ok(bytes) => Ok(ParamValue::Text(
                String::from_utf8_lossy(&bytes).into_owned(),
            )),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.ensure_root()?;
                Ok(ParamValue::Absent)
            }
            Err(e) => Err(ParamsError::unavailable(format!(
                "failed to read {}: {}",
                key, e
            ))),
        }
    }

    fn write(&self, key: &str, value: ParamValue) -> ParamsResult<()> {
        let Some(bytes) = value.to_bytes() else {
            return self.remove(key);
        };
        validate_key(key)?;
        self.ensure_root()?;

        let write_err =
            |e: io::Error| ParamsError::unavailable(format!("failed to write {}: {}", key, e));
        let mut tmp = NamedTempFile::new_in(&self.root).map_err(write_err)?;
        tmp.write_all(&bytes).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(self.key_path(key))
            .map_err(|e| write_err(e.error))?;

        tracing::debug!("Wrote parameter {} ({} bytes)", key, bytes.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> ParamsResult<()> {
        validate_key(key)?;
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => self.ensure_root(),
            Err(e) => Err(ParamsError::unavailable(format!(
                "failed to remove {}: {}",
                key, e
            ))),
        }
    }

    fn backend_name(&self) -> &'static str {
        "directory"
    }
}
