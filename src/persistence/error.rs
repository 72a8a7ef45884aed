//! Store error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur reading or writing records in a store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record {0} not found")]
    NotFound(Uuid),

    /// Another writer saved the record since it was loaded
    #[error("Record {id} is stale (loaded version {expected}, stored version {found})")]
    Stale { id: Uuid, expected: u64, found: u64 },

    /// Serialization to the stored binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from the stored binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),
}
