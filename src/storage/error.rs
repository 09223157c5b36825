//! Storage error types.

use crate::builder::BuildError;
use crate::storage::validate::RecordViolation;
use thiserror::Error;

/// Errors that can occur while saving or loading records.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Record validation found one or more problems
    #[error("Invalid record: {} violation(s)", .0.len())]
    InvalidRecord(Vec<RecordViolation>),

    /// No reconstructor is registered for the trigger tag
    #[error("No trigger reconstructor registered for tag '{tag}'")]
    UnknownTrigger { tag: String },

    /// The reconstructor rejected the payload
    #[error("Invalid payload for trigger '{tag}': {reason}")]
    InvalidTrigger { tag: String, reason: String },

    /// No callback is registered under the name
    #[error("No callback registered under '{name}'")]
    UnknownCallback { name: String },

    /// A saved execution names a state the automaton does not have
    #[error("Unknown state '{name}' in saved execution")]
    UnknownState { name: String },

    #[error("Trigger tag '{tag}' is already registered")]
    DuplicateTrigger { tag: String },

    #[error("Callback '{name}' is already registered")]
    DuplicateCallback { name: String },

    /// Record version is not supported by this version
    #[error("Unsupported record version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Rebuilding the automaton failed: {0}")]
    Build(#[from] BuildError),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Binary serialization failed: {0}")]
    Binary(#[from] bincode::Error),
}
