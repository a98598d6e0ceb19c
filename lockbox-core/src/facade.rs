//! The typed value facade over the store gateway.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use lockbox_store::{Accessibility, SecretStore};

use crate::archive::{self, Archiver, CborArchiver, Value, ValueKind};
use crate::error::{DecodeError, LockboxError};
use crate::gateway::StoreGateway;

/// Receives every store- or decode-level failure the facade absorbs.
///
/// The facade holds the observer behind a shared handle and never assumes a
/// particular invocation thread. When no observer is registered, failures
/// silently degrade into default return values.
pub trait ErrorObserver: Send + Sync {
    /// Called with the facade the failure happened on and the failure
    /// itself.
    fn on_error(&self, source: &Lockbox, error: &LockboxError);
}

/// Typed, policy-aware access to a secret store.
///
/// Getters for scalars degrade to the type's zero value on any failure,
/// getters for strings/bytes/objects degrade to empty/`None`, and setters
/// fire-and-report: every failure is routed to the registered
/// [`ErrorObserver`] instead of being raised at the call site. A failed read
/// is indistinguishable from "key never set" unless an observer is attached;
/// this is a deliberate best-effort read policy.
///
/// Instances are caller-constructed; there is no process-wide default.
/// Configuration setters take `&mut self` and are meant to run before or
/// between operations, data accessors take `&self` and may be shared across
/// threads.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use lockbox_core::Lockbox;
/// use lockbox_store::MemoryStore;
///
/// let lockbox = Lockbox::new(Arc::new(MemoryStore::new()), "com.example.app");
/// lockbox.set_string("token", "abc");
/// assert_eq!(lockbox.get_string("token"), "abc");
/// ```
pub struct Lockbox {
    gateway: StoreGateway,
    archiver: Arc<dyn Archiver>,
    defaults: HashMap<String, Value>,
    observer: Option<Arc<dyn ErrorObserver>>,
}

/// Outcome of the store round-trip a getter starts with.
enum Fetched {
    /// The store holds bytes for the key.
    Stored(Vec<u8>),
    /// The store has no entry, the default registry does.
    Registered(Value),
    /// Nothing anywhere (or a failure already reported to the observer).
    Missing,
}

impl Lockbox {
    /// Creates a facade scoped to `service`, using the shipped CBOR
    /// archiver, the default protection class, no access group, and no
    /// observer.
    pub fn new(store: Arc<dyn SecretStore>, service: impl Into<String>) -> Self {
        Self {
            gateway: StoreGateway::new(store, service),
            archiver: Arc::new(CborArchiver),
            defaults: HashMap::new(),
            observer: None,
        }
    }

    /// Replaces the archiver used for object values.
    pub fn set_archiver(&mut self, archiver: Arc<dyn Archiver>) {
        self.archiver = archiver;
    }

    // Configuration surface. These mirror the gateway's scope settings; see
    // `StoreGateway` for the semantics of each.

    /// The service namespace of this facade.
    #[must_use]
    pub fn service(&self) -> &str {
        self.gateway.service()
    }

    /// The configured access group, if any.
    #[must_use]
    pub fn access_group(&self) -> Option<&str> {
        self.gateway.access_group()
    }

    /// The protection class applied to writes.
    #[must_use]
    pub const fn accessibility(&self) -> Accessibility {
        self.gateway.accessibility()
    }

    /// The additional parameters merged into every store query.
    #[must_use]
    pub const fn additional_query_params(&self) -> &BTreeMap<String, String> {
        self.gateway.additional_params()
    }

    /// Re-scopes subsequent operations to a different service namespace.
    pub fn set_service(&mut self, service: impl Into<String>) {
        self.gateway.set_service(service);
    }

    /// Scopes subsequent operations to an access group.
    pub fn set_access_group(&mut self, access_group: Option<String>) {
        self.gateway.set_access_group(access_group);
    }

    /// Changes the protection class for subsequent writes.
    pub const fn set_accessibility(&mut self, accessibility: Accessibility) {
        self.gateway.set_accessibility(accessibility);
    }

    /// Replaces the additional query parameters.
    pub fn set_additional_query_params(&mut self, params: BTreeMap<String, String>) {
        self.gateway.set_additional_params(params);
    }

    /// Registers (or clears) the error observer.
    pub fn set_error_observer(&mut self, observer: Option<Arc<dyn ErrorObserver>>) {
        self.observer = observer;
    }

    /// Merges `defaults` into the in-memory default registry.
    ///
    /// Registered values are consulted only when the store has no entry for
    /// a key; they are never written to the store. Later calls overwrite
    /// earlier values for the same key.
    pub fn register_defaults(&mut self, defaults: HashMap<String, Value>) {
        self.defaults.extend(defaults);
    }

    // Getters.

    /// Reads a boolean; `false` on absence or failure.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> bool {
        match self.fetch(key) {
            Fetched::Stored(bytes) => self
                .ok_or_report(archive::decode_bool(&bytes).map_err(Into::into))
                .unwrap_or_default(),
            Fetched::Registered(value) => value.as_bool().unwrap_or_default(),
            Fetched::Missing => false,
        }
    }

    /// Reads an integer; `0` on absence or failure.
    #[must_use]
    pub fn get_integer(&self, key: &str) -> i64 {
        match self.fetch(key) {
            Fetched::Stored(bytes) => self
                .ok_or_report(archive::decode_i64(&bytes).map_err(Into::into))
                .unwrap_or_default(),
            Fetched::Registered(value) => value.as_integer().unwrap_or_default(),
            Fetched::Missing => 0,
        }
    }

    /// Reads a float; `0.0` on absence or failure.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn get_float(&self, key: &str) -> f32 {
        match self.fetch(key) {
            Fetched::Stored(bytes) => self
                .ok_or_report(archive::decode_f32(&bytes).map_err(Into::into))
                .unwrap_or_default(),
            Fetched::Registered(value) => value.as_float().unwrap_or_default() as f32,
            Fetched::Missing => 0.0,
        }
    }

    /// Reads a double; `0.0` on absence or failure.
    #[must_use]
    pub fn get_double(&self, key: &str) -> f64 {
        match self.fetch(key) {
            Fetched::Stored(bytes) => self
                .ok_or_report(archive::decode_f64(&bytes).map_err(Into::into))
                .unwrap_or_default(),
            Fetched::Registered(value) => value.as_float().unwrap_or_default(),
            Fetched::Missing => 0.0,
        }
    }

    /// Reads a string; empty on absence or failure.
    #[must_use]
    pub fn get_string(&self, key: &str) -> String {
        match self.fetch(key) {
            Fetched::Stored(bytes) => self
                .ok_or_report(String::from_utf8(bytes).map_err(|err| {
                    DecodeError::MalformedPayload {
                        context: format!("stored string is not UTF-8: {err}"),
                    }
                    .into()
                }))
                .unwrap_or_default(),
            Fetched::Registered(value) => value.as_text().unwrap_or_default().to_string(),
            Fetched::Missing => String::new(),
        }
    }

    /// Reads a raw byte blob verbatim; `None` on absence or failure.
    #[must_use]
    pub fn get_data(&self, key: &str) -> Option<Vec<u8>> {
        match self.fetch(key) {
            Fetched::Stored(bytes) => Some(bytes),
            Fetched::Registered(value) => value.as_bytes().map(<[u8]>::to_vec),
            Fetched::Missing => None,
        }
    }

    /// Reads an archived value, allowing `extra_kinds` beyond the built-in
    /// base allow-list; `None` on absence or failure.
    ///
    /// A stored archive reconstructing any kind outside the merged
    /// allow-list fails closed: the observer is notified and `None` is
    /// returned, never a partially-accepted value.
    #[must_use]
    pub fn get_object(&self, key: &str, extra_kinds: &[ValueKind]) -> Option<Value> {
        match self.fetch(key) {
            Fetched::Stored(bytes) => self.ok_or_report(
                self.archiver
                    .decode(&bytes, extra_kinds)
                    .map_err(Into::into),
            ),
            Fetched::Registered(value) => Some(value),
            Fetched::Missing => None,
        }
    }

    /// Reads an archived value with the built-in base allow-list only.
    #[must_use]
    pub fn get_object_with_defaults(&self, key: &str) -> Option<Value> {
        self.get_object(key, &[])
    }

    // Setters. Fire-and-report: failures go to the observer, never the call
    // site.

    /// Writes a boolean under `key`.
    pub fn set_bool(&self, key: &str, value: bool) {
        self.write(key, &archive::encode_bool(value));
    }

    /// Writes an integer under `key`.
    pub fn set_integer(&self, key: &str, value: i64) {
        self.write(key, &archive::encode_i64(value));
    }

    /// Writes a float under `key`.
    pub fn set_float(&self, key: &str, value: f32) {
        self.write(key, &archive::encode_f32(value));
    }

    /// Writes a double under `key`.
    pub fn set_double(&self, key: &str, value: f64) {
        self.write(key, &archive::encode_f64(value));
    }

    /// Writes a string under `key` as UTF-8 bytes.
    pub fn set_string(&self, key: &str, value: &str) {
        self.write(key, value.as_bytes());
    }

    /// Writes a raw byte blob under `key`, verbatim.
    pub fn set_data(&self, key: &str, value: &[u8]) {
        self.write(key, value);
    }

    /// Archives `value` and writes it under `key`.
    pub fn set_object(&self, key: &str, value: &Value) {
        if let Some(bytes) = self.ok_or_report(self.archiver.encode(value).map_err(Into::into)) {
            self.write(key, &bytes);
        }
    }

    // Deletes.

    /// Removes the item for `key`. Idempotent: an absent key is not a
    /// failure. The default registry is untouched.
    pub fn delete_for_key(&self, key: &str) {
        let result = self.gateway.delete(key).map_err(Into::into);
        self.ok_or_report(result);
    }

    /// Removes every item in this facade's scope, leaving the default
    /// registry untouched. Returns whether the store confirmed the delete.
    pub fn delete_all(&self) -> bool {
        let result = self.gateway.delete_all().map_err(Into::into);
        self.ok_or_report(result).is_some()
    }

    // Internals.

    fn fetch(&self, key: &str) -> Fetched {
        match self.gateway.find(key) {
            Ok(Some(bytes)) => Fetched::Stored(bytes),
            Ok(None) => self
                .defaults
                .get(key)
                .cloned()
                .map_or(Fetched::Missing, Fetched::Registered),
            Err(err) => {
                self.report(&err.into());
                Fetched::Missing
            }
        }
    }

    fn write(&self, key: &str, payload: &[u8]) {
        let result = self.gateway.upsert(key, payload).map_err(Into::into);
        self.ok_or_report(result);
    }

    fn ok_or_report<T>(&self, result: Result<T, LockboxError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.report(&err);
                None
            }
        }
    }

    fn report(&self, error: &LockboxError) {
        log::debug!("lockbox operation failed: {error}");
        if let Some(observer) = &self.observer {
            observer.on_error(self, error);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use lockbox_store::{ItemQuery, MemoryStore, Status};

    use crate::error::StoreError;

    use super::*;

    /// Observer that records every reported failure.
    #[derive(Default)]
    struct RecordingObserver {
        errors: Mutex<Vec<LockboxError>>,
    }

    impl RecordingObserver {
        fn last(&self) -> Option<LockboxError> {
            self.errors.lock().unwrap().last().cloned()
        }

        fn count(&self) -> usize {
            self.errors.lock().unwrap().len()
        }
    }

    impl ErrorObserver for RecordingObserver {
        fn on_error(&self, _source: &Lockbox, error: &LockboxError) {
            self.errors.lock().unwrap().push(error.clone());
        }
    }

    /// Engine that fails every operation with a fixed status.
    struct BrokenStore(Status);

    impl SecretStore for BrokenStore {
        fn add(&self, _: &ItemQuery, _: &[u8]) -> Status {
            self.0
        }
        fn find(&self, _: &ItemQuery) -> (Status, Option<Vec<u8>>) {
            (self.0, None)
        }
        fn update(&self, _: &ItemQuery, _: &[u8]) -> Status {
            self.0
        }
        fn delete(&self, _: &ItemQuery) -> Status {
            self.0
        }
    }

    fn observed_lockbox(store: Arc<dyn SecretStore>) -> (Lockbox, Arc<RecordingObserver>) {
        let observer = Arc::new(RecordingObserver::default());
        let mut lockbox = Lockbox::new(store, "com.example.tests");
        lockbox.set_error_observer(Some(Arc::clone(&observer) as Arc<dyn ErrorObserver>));
        (lockbox, observer)
    }

    #[test]
    fn test_store_failure_reaches_observer() {
        let (lockbox, observer) =
            observed_lockbox(Arc::new(BrokenStore(Status::INTERACTION_NOT_ALLOWED)));

        assert_eq!(lockbox.get_integer("k"), 0);
        assert_eq!(
            observer.last(),
            Some(LockboxError::Store(StoreError::Unexpected(
                Status::INTERACTION_NOT_ALLOWED
            )))
        );
    }

    #[test]
    fn test_failed_write_is_reported_not_raised() {
        let (lockbox, observer) = observed_lockbox(Arc::new(BrokenStore(Status::NOT_AVAILABLE)));

        lockbox.set_string("token", "abc");
        assert_eq!(observer.count(), 1);
    }

    #[test]
    fn test_delete_all_failure_returns_false() {
        let (lockbox, observer) = observed_lockbox(Arc::new(BrokenStore(Status::NOT_AVAILABLE)));

        assert!(!lockbox.delete_all());
        assert_eq!(observer.count(), 1);
    }

    #[test]
    fn test_no_observer_failures_degrade_silently() {
        let lockbox = Lockbox::new(Arc::new(BrokenStore(Status::NOT_AVAILABLE)), "svc");
        assert_eq!(lockbox.get_string("k"), "");
        assert_eq!(lockbox.get_data("k"), None);
    }

    #[test]
    fn test_decode_failure_degrades_to_zero() {
        let (lockbox, observer) = observed_lockbox(Arc::new(MemoryStore::new()));

        // One boolean byte is not a valid integer payload.
        lockbox.set_bool("flag", true);
        assert_eq!(lockbox.get_integer("flag"), 0);
        assert!(matches!(
            observer.last(),
            Some(LockboxError::Decode(DecodeError::MalformedPayload { .. }))
        ));
    }

    #[test]
    fn test_store_failure_does_not_consult_registry() {
        let (mut lockbox, _observer) =
            observed_lockbox(Arc::new(BrokenStore(Status::NOT_AVAILABLE)));
        lockbox.register_defaults(HashMap::from([("x".to_string(), Value::from(5_i64))]));

        // The registry only covers not-found, not failures.
        assert_eq!(lockbox.get_integer("x"), 0);
    }

    #[test]
    fn test_register_defaults_overwrites_per_key() {
        let mut lockbox = Lockbox::new(Arc::new(MemoryStore::new()), "svc");
        lockbox.register_defaults(HashMap::from([("x".to_string(), Value::from(5_i64))]));
        lockbox.register_defaults(HashMap::from([("x".to_string(), Value::from(7_i64))]));

        assert_eq!(lockbox.get_integer("x"), 7);
    }

    #[test]
    fn test_default_of_mismatched_kind_degrades_to_zero() {
        let mut lockbox = Lockbox::new(Arc::new(MemoryStore::new()), "svc");
        lockbox.register_defaults(HashMap::from([("x".to_string(), Value::from("text"))]));

        assert_eq!(lockbox.get_integer("x"), 0);
        assert!(!lockbox.get_bool("x"));
        assert_eq!(lockbox.get_string("x"), "text");
    }
}
