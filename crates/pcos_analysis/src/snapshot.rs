//! Registry snapshots in `MessagePack` format.
//!
//! A snapshot lets a caller cache the registry of one run and reload it
//! later without re-parsing. Nothing in the analyzer writes snapshots itself.

use pcos_foundation::{Error, ErrorContext, ErrorKind, Result};

use crate::registry::ProjectRegistry;

/// Serializes a registry to bytes.
///
/// Uses named serialization to preserve struct field names.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes(registry: &ProjectRegistry) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(registry).map_err(|e| serialization_error(&e, "snapshot encode"))
}

/// Deserializes a registry from bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not a valid registry snapshot.
pub fn from_bytes(bytes: &[u8]) -> Result<ProjectRegistry> {
    rmp_serde::from_slice(bytes).map_err(|e| serialization_error(&e, "snapshot decode"))
}

fn serialization_error(err: &impl std::fmt::Display, stage: &str) -> Error {
    Error::new(ErrorKind::SerializationError(err.to_string()))
        .with_context(ErrorContext::new().with_stage(stage))
}
