//! Persistence backend contract.

use crate::error::ParamsResult;
use crate::value::ParamValue;

/// Raw access to a parameter backend.
///
/// Implementations must not cache values on behalf of callers: other
/// processes may write the same keys at any time, so every `read` goes to
/// the backing storage.
pub trait ParamStore: Send + Sync {
    /// Read a key; `Ok(ParamValue::Absent)` when it has never been written
    fn read(&self, key: &str) -> ParamsResult<ParamValue>;

    /// Upsert a key. Writing `ParamValue::Absent` removes it.
    fn write(&self, key: &str, value: ParamValue) -> ParamsResult<()>;

    /// Delete a key. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> ParamsResult<()>;

    /// Short backend name for log messages
    fn backend_name(&self) -> &'static str;
}
