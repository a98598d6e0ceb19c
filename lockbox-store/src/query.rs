//! Attribute set carried by every secret-store engine call.

use std::collections::BTreeMap;

use crate::accessibility::Accessibility;

/// The class of item a query addresses.
///
/// Generic secrets are the only class this vocabulary supports; the variant
/// exists so queries stay self-describing for engines that store more.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ItemClass {
    /// A generic secret: an opaque payload under an account/service identity.
    #[default]
    GenericSecret,
}

/// A fully-formed query against a secret-store engine.
///
/// The identity attributes (`class`, `account`, `service`, `access_group`)
/// are dedicated fields rather than entries in the `extra` map, so merged
/// caller parameters can never override them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemQuery {
    /// Item class. Always [`ItemClass::GenericSecret`] for this vocabulary.
    pub class: ItemClass,
    /// Account key identifying the item within its scope. `None` addresses
    /// every item in the `(service, access_group)` scope (delete-all).
    pub account: Option<String>,
    /// Logical service namespace. Mandatory.
    pub service: String,
    /// Optional entitlement-shared access group.
    pub access_group: Option<String>,
    /// Protection class applied on add/update.
    pub accessibility: Accessibility,
    /// Extra attribute/value pairs merged in by the caller.
    pub extra: BTreeMap<String, String>,
}

impl ItemQuery {
    /// Creates a query scoped to `service` with no account and default
    /// attributes.
    #[must_use]
    pub fn scoped(service: impl Into<String>) -> Self {
        Self {
            class: ItemClass::GenericSecret,
            account: None,
            service: service.into(),
            access_group: None,
            accessibility: Accessibility::default(),
            extra: BTreeMap::new(),
        }
    }

    /// Narrows the query to a single account key.
    #[must_use]
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }
}
