//! Parameter keys
//!
//! Keys live in one flat, case-sensitive namespace. Because the directory
//! backend stores each key as a file name, only ASCII alphanumerics, `_` and
//! `-` are accepted.

use crate::error::{ParamsError, ParamsResult};
use std::borrow::Cow;
use std::fmt;

/// Longest accepted key, in bytes
pub const MAX_KEY_LEN: usize = 128;

/// Check whether `key` is a well-formed parameter name
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Validate a key, returning `InvalidKey` when malformed
pub fn validate_key(key: &str) -> ParamsResult<()> {
    if is_valid_key(key) {
        Ok(())
    } else {
        Err(ParamsError::InvalidKey(key.to_string()))
    }
}

/// A parameter name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamKey(Cow<'static, str>);

impl ParamKey {
    /// Wrap a compile-time key name. Validity is checked on first write.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Parse a runtime key name
    pub fn parse(name: impl Into<String>) -> ParamsResult<Self> {
        let name = name.into();
        validate_key(&name)?;
        Ok(Self(Cow::Owned(name)))
    }

    /// Key name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ParamKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ParamKey {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_keys() {
        assert!(is_valid_key("DongleId"));
        assert!(is_valid_key("Is_RHD-2"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("../etc/passwd"));
        assert!(!is_valid_key("has space"));
        assert!(!is_valid_key(&"x".repeat(MAX_KEY_LEN + 1)));
    }

    #[test]
    fn test_parse_rejects_bad_names() {
        assert!(ParamKey::parse("GitCommit").is_ok());
        assert!(matches!(
            ParamKey::parse("a/b"),
            Err(ParamsError::InvalidKey(k)) if k == "a/b"
        ));
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let a = ParamKey::from_static("IsMetric");
        let b = ParamKey::parse("ismetric").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "IsMetric");
    }
}
