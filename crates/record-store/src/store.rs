//! The record store contract.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use seatrack_common::NewLocationRecord;

/// Failure of a record store write. The display text is the human-readable
/// reason surfaced to callers.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the write.
    #[error("record store rejected the write: {0}")]
    Rejected(String),

    /// The record could not be serialized for the store.
    #[error("failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Identifier generated by the store for an appended record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap a store-generated identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Append-only client for the shared location collection.
///
/// Implementations assign the record identifier and the timestamp at write
/// time; records are never mutated or deleted through this interface.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Append one location report, returning the generated identifier.
    async fn append(&self, report: NewLocationRecord) -> Result<RecordId, StoreError>;
}
