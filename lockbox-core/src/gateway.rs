//! Translates logical key operations into store queries and normalizes the
//! engine's raw statuses into typed results.

use std::collections::BTreeMap;
use std::sync::Arc;

use lockbox_store::{Accessibility, ItemQuery, SecretStore, Status};

use crate::error::StoreError;

/// Executes logical operations against a [`SecretStore`] on behalf of one
/// `(service, access_group)` scope.
///
/// Every query the gateway builds carries the generic-secret class, the key
/// as the account attribute, the configured scope, the accessibility
/// attribute, and the caller's additional parameters. Identity attributes
/// live in dedicated [`ItemQuery`] fields, so additional parameters can
/// narrow matching but never override identity.
pub struct StoreGateway {
    store: Arc<dyn SecretStore>,
    service: String,
    access_group: Option<String>,
    accessibility: Accessibility,
    additional_params: BTreeMap<String, String>,
}

impl StoreGateway {
    /// Creates a gateway scoped to `service` with default configuration.
    pub fn new(store: Arc<dyn SecretStore>, service: impl Into<String>) -> Self {
        Self {
            store,
            service: service.into(),
            access_group: None,
            accessibility: Accessibility::default(),
            additional_params: BTreeMap::new(),
        }
    }

    /// The service namespace this gateway operates in.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// The entitlement-shared access group, if one is configured.
    #[must_use]
    pub fn access_group(&self) -> Option<&str> {
        self.access_group.as_deref()
    }

    /// The protection class applied to writes.
    #[must_use]
    pub const fn accessibility(&self) -> Accessibility {
        self.accessibility
    }

    /// The additional parameters merged into every query.
    #[must_use]
    pub const fn additional_params(&self) -> &BTreeMap<String, String> {
        &self.additional_params
    }

    /// Re-scopes subsequent operations to a different service namespace.
    /// Items written under the previous service stay where they are.
    pub fn set_service(&mut self, service: impl Into<String>) {
        self.service = service.into();
    }

    /// Scopes subsequent operations to an access group.
    pub fn set_access_group(&mut self, access_group: Option<String>) {
        self.access_group = access_group;
    }

    /// Changes the protection class for subsequent writes. Items already
    /// written keep the class they were written with.
    pub const fn set_accessibility(&mut self, accessibility: Accessibility) {
        self.accessibility = accessibility;
    }

    /// Replaces the additional parameters merged into every query.
    pub fn set_additional_params(&mut self, params: BTreeMap<String, String>) {
        self.additional_params = params;
    }

    /// Inserts a new item for `key`.
    ///
    /// # Errors
    ///
    /// [`StoreError::DuplicateItem`] when the identity already holds an item;
    /// [`StoreError::Unexpected`] for any other engine failure.
    pub fn add(&self, key: &str, payload: &[u8]) -> Result<(), StoreError> {
        result_of(self.store.add(&self.query(Some(key)), payload))
    }

    /// Looks up the payload stored for `key`. Absence is `Ok(None)`, not an
    /// error.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unexpected`] for any engine failure other than
    /// not-found.
    pub fn find(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let (status, payload) = self.store.find(&self.query(Some(key)));
        if status.is_success() {
            return Ok(payload);
        }
        match classify(status) {
            StoreError::ItemNotFound => Ok(None),
            err => Err(err),
        }
    }

    /// Replaces the payload of the existing item for `key`.
    ///
    /// # Errors
    ///
    /// [`StoreError::ItemNotFound`] when no item exists;
    /// [`StoreError::Unexpected`] for any other engine failure.
    pub fn update(&self, key: &str, payload: &[u8]) -> Result<(), StoreError> {
        result_of(self.store.update(&self.query(Some(key)), payload))
    }

    /// Writes `payload` under `key` whether or not an item exists.
    ///
    /// Runs update first and falls back to add on not-found, so a writer
    /// that loses the resulting add race sees `DuplicateItem` and retries
    /// once more as an update. One retry bounds the benign two-writer race;
    /// anything beyond it surfaces as the error.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unexpected`] for engine failures; the duplicate and
    /// not-found statuses are absorbed by the fallback sequence unless the
    /// retry itself fails.
    pub fn upsert(&self, key: &str, payload: &[u8]) -> Result<(), StoreError> {
        match self.update(key, payload) {
            Err(StoreError::ItemNotFound) => match self.add(key, payload) {
                Err(StoreError::DuplicateItem) => {
                    log::debug!("lost add race for key {key:?}, retrying as update");
                    self.update(key, payload)
                }
                result => result,
            },
            result => result,
        }
    }

    /// Deletes the item for `key`. Idempotent: a missing item is success.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unexpected`] for any engine failure other than
    /// not-found.
    pub fn delete(&self, key: &str) -> Result<(), StoreError> {
        absorb_not_found(self.store.delete(&self.query(Some(key))))
    }

    /// Deletes every item in this gateway's `(service, access_group)` scope
    /// and nothing outside it. An already-empty scope is success.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unexpected`] for any engine failure other than
    /// not-found.
    pub fn delete_all(&self) -> Result<(), StoreError> {
        absorb_not_found(self.store.delete(&self.query(None)))
    }

    fn query(&self, account: Option<&str>) -> ItemQuery {
        let mut query = ItemQuery::scoped(self.service.clone());
        query.account = account.map(str::to_string);
        query.access_group = self.access_group.clone();
        query.accessibility = self.accessibility;
        query.extra = self.additional_params.clone();
        query
    }
}

const fn classify(status: Status) -> StoreError {
    match status {
        Status::DUPLICATE_ITEM => StoreError::DuplicateItem,
        Status::ITEM_NOT_FOUND => StoreError::ItemNotFound,
        other => StoreError::Unexpected(other),
    }
}

fn result_of(status: Status) -> Result<(), StoreError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(classify(status))
    }
}

fn absorb_not_found(status: Status) -> Result<(), StoreError> {
    match result_of(status) {
        Err(StoreError::ItemNotFound) => Ok(()),
        result => result,
    }
}
