//! Pure functions for serializing/deserializing entities to/from cache bytes.
//!
//! Values are JSON objects holding the entity's full flat field set, so a cache
//! hit reconstructs exactly what the store would have returned.

use thiserror::Error;

use crate::academic::Entity;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to bytes.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize bytes to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Serializes an entity to JSON bytes.
pub fn serialize_entity<E: Entity>(entity: &E) -> Result<Vec<u8>> {
    serde_json::to_vec(entity).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to an entity.
///
/// Fails when any field is missing, so a partially written or outdated cache
/// value is never mistaken for a complete record.
pub fn deserialize_entity<E: Entity>(bytes: &[u8]) -> Result<E> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
