//! Run correlation
//!
//! A capture pass or a reconciliation pass gets one `RunId`; every log event
//! emitted inside that pass carries it so interleaved output from parallel
//! device workers can be regrouped afterwards.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a single capture or reconciliation run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    /// Generate a new time-ordered RunId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
