use serde::{Deserialize, Serialize};

use crate::addr::DEFAULT_PLACEHOLDER;

/// Default capacity of the read-side buffer, matching tokio's `BufReader`.
pub const DEFAULT_BUFFER_CAPACITY: usize = 8 * 1024;

/// Settings for a [`StdioConnection`](crate::StdioConnection)
///
/// Every field has a default, so a partial (or empty) document deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StdioConfig {
    /// Wrap the input stream in a buffered reader
    pub buffered: bool,

    /// Read buffer size, ignored when `buffered` is false
    pub buffer_capacity: usize,

    /// Address reported for both endpoints
    pub address: String,
}

impl Default for StdioConfig {
    fn default() -> Self {
        Self {
            buffered: true,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            address: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}
