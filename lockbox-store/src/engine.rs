//! The engine trait every secret-store backend implements.

use crate::query::ItemQuery;
use crate::status::Status;

/// A platform secret-store engine.
///
/// The engine is an opaque keyed store: it receives fully-formed
/// [`ItemQuery`] values and reports raw [`Status`] codes. It performs no
/// typed encoding and no policy decisions of its own; both live above it in
/// the gateway and facade layers.
///
/// Implementations must serialize access internally: callers are allowed to
/// issue operations from multiple threads against one shared engine.
pub trait SecretStore: Send + Sync {
    /// Inserts a new item holding `payload`.
    ///
    /// Returns [`Status::DUPLICATE_ITEM`] if an item with the same identity
    /// tuple already exists.
    fn add(&self, query: &ItemQuery, payload: &[u8]) -> Status;

    /// Looks up the item addressed by `query`.
    ///
    /// On success returns the stored payload; returns
    /// [`Status::ITEM_NOT_FOUND`] and no payload when absent.
    fn find(&self, query: &ItemQuery) -> (Status, Option<Vec<u8>>);

    /// Replaces the payload of an existing item.
    ///
    /// Returns [`Status::ITEM_NOT_FOUND`] if no item matches the identity
    /// tuple.
    fn update(&self, query: &ItemQuery, payload: &[u8]) -> Status;

    /// Deletes every item matching `query`.
    ///
    /// A query with an account deletes at most one item; a query without one
    /// deletes the whole `(service, access_group)` scope. Returns
    /// [`Status::ITEM_NOT_FOUND`] when nothing matched.
    fn delete(&self, query: &ItemQuery) -> Status;
}
