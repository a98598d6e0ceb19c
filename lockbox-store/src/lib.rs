//! Secret-store engine vocabulary for Lockbox.
//!
//! This crate defines the interface between the typed facade in
//! `lockbox-core` and whatever secret-store engine actually holds the data:
//!
//! * [`Status`] — raw result codes, following the platform security
//!   framework's numbering so real backends can pass codes through.
//! * [`ItemQuery`] / [`ItemClass`] — the attribute set carried by every call.
//! * [`Accessibility`] — the protection-class attribute applied on writes.
//! * [`SecretStore`] — the trait every engine implements.
//! * [`MemoryStore`] — an in-memory engine for tests and development.
//!
//! Consumer code never interprets raw statuses itself; the gateway in
//! `lockbox-core` normalizes them into typed errors.

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

mod accessibility;
mod engine;
mod memory;
mod query;
mod status;

pub use accessibility::Accessibility;
pub use engine::SecretStore;
pub use memory::MemoryStore;
pub use query::{ItemClass, ItemQuery};
pub use status::Status;
