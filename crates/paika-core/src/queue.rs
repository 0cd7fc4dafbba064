//! Queue identifiers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from queue id validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueIdError {
    /// Input was empty or whitespace-only.
    #[error("queue id is empty")]
    Empty,
}

/// Opaque identifier for a queue ("party") on the remote service.
///
/// Always supplied externally - scanned code, deep link, or manual entry.
/// The client never generates one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueId(String);

impl QueueId {
    /// Validate external input as a queue id.
    ///
    /// Surrounding whitespace is trimmed; an empty remainder is rejected.
    pub fn parse(raw: &str) -> Result<Self, QueueIdError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QueueIdError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The id as sent in `party=` query parameters.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QueueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
