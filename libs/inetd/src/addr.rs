use std::fmt;

use serde::{Deserialize, Serialize};

/// Address reported when a connection is served over inherited streams.
pub const DEFAULT_PLACEHOLDER: &str = "127.0.0.1";

/// Fixed, non-authoritative address of a stream-backed connection
///
/// There is no socket behind stdin/stdout, so the real peer is unknown.
/// The same literal is reported as local address, remote address and
/// network kind. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PlaceholderAddr(String);

impl PlaceholderAddr {
    /// Create a placeholder, falling back to [`DEFAULT_PLACEHOLDER`] when `addr` is empty
    pub fn new(addr: impl Into<String>) -> Self {
        let addr = addr.into();
        if addr.is_empty() {
            Self::default()
        } else {
            Self(addr)
        }
    }

    /// Network kind, which is the literal itself
    pub fn network(&self) -> &str {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PlaceholderAddr {
    fn default() -> Self {
        Self(DEFAULT_PLACEHOLDER.to_string())
    }
}

impl fmt::Display for PlaceholderAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PlaceholderAddr {
    fn from(addr: String) -> Self {
        Self::new(addr)
    }
}

impl From<PlaceholderAddr> for String {
    fn from(addr: PlaceholderAddr) -> Self {
        addr.0
    }
}
