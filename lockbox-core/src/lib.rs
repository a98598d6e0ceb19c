//! Typed, policy-aware facade over platform secret stores.
//!
//! Two layers, composed top-down:
//!
//! * [`StoreGateway`] — turns logical add/find/update/upsert/delete
//!   operations into well-formed [`lockbox_store::ItemQuery`] values and
//!   normalizes engine statuses into typed results.
//! * [`Lockbox`] — typed get/set/delete accessors for booleans, integers,
//!   floats, doubles, strings, raw bytes, and archived [`Value`] graphs,
//!   with an in-memory default registry and an optional [`ErrorObserver`]
//!   that receives every absorbed failure.
//!
//! Object values are archived to self-describing CBOR and reconstructed
//! through a closed, allow-listed kind set; see [`archive`].

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod archive;
mod error;
mod facade;
mod gateway;

pub use archive::{Archiver, CborArchiver, Value, ValueKind, BASE_ALLOWED_KINDS};
pub use error::{ArchiveError, DecodeError, LockboxError, StoreError};
pub use facade::{ErrorObserver, Lockbox};
pub use gateway::StoreGateway;

// The store vocabulary consumers need to construct and back a facade.
pub use lockbox_store::{Accessibility, MemoryStore, SecretStore, Status};
