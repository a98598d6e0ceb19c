//! In-memory secret-store engine.
//!
//! Backs the test suites and serves as a development stand-in where no
//! platform store exists. Payload copies are zeroized when items are
//! dropped, but the engine offers no real at-rest protection.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use zeroize::Zeroizing;

use crate::query::ItemQuery;
use crate::status::Status;
use crate::SecretStore;

/// Identity tuple an item is stored under.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ItemIdentity {
    service: String,
    access_group: Option<String>,
    account: String,
}

impl ItemIdentity {
    fn of(query: &ItemQuery, account: &str) -> Self {
        Self {
            service: query.service.clone(),
            access_group: query.access_group.clone(),
            account: account.to_string(),
        }
    }
}

/// A stored item: the payload plus the attributes it was written with.
struct StoredItem {
    payload: Zeroizing<Vec<u8>>,
    accessibility: &'static str,
    attributes: BTreeMap<String, String>,
}

impl StoredItem {
    fn matches(&self, query: &ItemQuery) -> bool {
        query
            .extra
            .iter()
            .all(|(k, v)| self.attributes.get(k) == Some(v))
    }
}

/// Mutex-guarded in-memory implementation of [`SecretStore`].
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<BTreeMap<ItemIdentity, StoredItem>>,
}

impl MemoryStore {
    /// Creates an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items currently held, across all scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` when no items are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The accessibility attribute the item matching `query` was last
    /// written with, if the item exists. Lets tests confirm the protection
    /// class actually reaches the engine.
    #[must_use]
    pub fn stored_accessibility(&self, query: &ItemQuery) -> Option<&'static str> {
        let account = query.account.as_deref()?;
        let identity = ItemIdentity::of(query, account);
        self.lock().get(&identity).map(|item| item.accessibility)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<ItemIdentity, StoredItem>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn store_item(query: &ItemQuery, payload: &[u8]) -> StoredItem {
        StoredItem {
            payload: Zeroizing::new(payload.to_vec()),
            accessibility: query.accessibility.attribute_value(),
            attributes: query.extra.clone(),
        }
    }
}

impl SecretStore for MemoryStore {
    fn add(&self, query: &ItemQuery, payload: &[u8]) -> Status {
        let Some(account) = query.account.as_deref() else {
            return Status::PARAM;
        };
        let identity = ItemIdentity::of(query, account);
        let mut items = self.lock();
        if items.contains_key(&identity) {
            return Status::DUPLICATE_ITEM;
        }
        items.insert(identity, Self::store_item(query, payload));
        Status::SUCCESS
    }

    fn find(&self, query: &ItemQuery) -> (Status, Option<Vec<u8>>) {
        let Some(account) = query.account.as_deref() else {
            return (Status::PARAM, None);
        };
        let identity = ItemIdentity::of(query, account);
        let items = self.lock();
        match items.get(&identity) {
            Some(item) if item.matches(query) => {
                (Status::SUCCESS, Some(item.payload.to_vec()))
            }
            _ => (Status::ITEM_NOT_FOUND, None),
        }
    }

    fn update(&self, query: &ItemQuery, payload: &[u8]) -> Status {
        let Some(account) = query.account.as_deref() else {
            return Status::PARAM;
        };
        let identity = ItemIdentity::of(query, account);
        let mut items = self.lock();
        match items.get_mut(&identity) {
            Some(item) if item.matches(query) => {
                item.payload = Zeroizing::new(payload.to_vec());
                item.accessibility = query.accessibility.attribute_value();
                item.attributes.extend(query.extra.clone());
                Status::SUCCESS
            }
            _ => Status::ITEM_NOT_FOUND,
        }
    }

    fn delete(&self, query: &ItemQuery) -> Status {
        let mut items = self.lock();
        let in_scope = |identity: &ItemIdentity| {
            identity.service == query.service
                && identity.access_group == query.access_group
                && query
                    .account
                    .as_deref()
                    .is_none_or(|account| identity.account == account)
        };
        let before = items.len();
        items.retain(|identity, item| !(in_scope(identity) && item.matches(query)));
        if items.len() == before {
            Status::ITEM_NOT_FOUND
        } else {
            Status::SUCCESS
        }
    }
}
