//! Error types for the gateway and the typed value facade.

use lockbox_store::Status;
use thiserror::Error;

use crate::archive::ValueKind;

/// Store-level failures surfaced by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    /// An add was attempted for an identity that already holds an item.
    #[error("duplicate_item")]
    DuplicateItem,
    /// An update or delete addressed an identity with no item.
    #[error("item_not_found")]
    ItemNotFound,
    /// Any engine status not otherwise classified, carrying the raw code.
    #[error("unexpected_store_status: {0}")]
    Unexpected(Status),
}

/// Failures reconstructing a typed value from stored bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The bytes do not parse as a valid archive or scalar encoding.
    #[error("malformed_payload: {context}")]
    MalformedPayload {
        /// What was being decoded.
        context: String,
    },
    /// The archive parsed but reconstructs a value kind outside the
    /// allow-list. Decoding fails closed; no value is produced.
    #[error("disallowed_kind: {found}")]
    DisallowedKind {
        /// The kind the archive would have reconstructed.
        found: ValueKind,
    },
}

/// Failure producing the archived byte form of a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("archive_failed: {message}")]
pub struct ArchiveError {
    /// Serializer diagnostic.
    pub message: String,
}

/// Any failure the facade can report to its error observer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LockboxError {
    /// The secret-store engine rejected an operation.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Stored bytes could not be reconstructed as the requested type.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// A value could not be archived for storage.
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}
