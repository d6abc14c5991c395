//! Identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// International Securities Identification Number.
///
/// Upstream data is trusted as-is; no checksum validation is applied.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Isin(pub String);

impl Isin {
    /// Create a new ISIN.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ISIN as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Isin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Isin {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Isin {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Legal Entity Identifier of a bond issuer.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Lei(pub String);

impl Lei {
    /// Create a new LEI.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the LEI as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Lei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Lei {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
