//! Key-value store with lazily resolved values
//!
//! Values are kept exactly as stored. [`ValueStore::fetch`] hands them back
//! verbatim, while [`ValueStore::rouse`] runs any producers inside them
//! through the same resolver the offer registry uses.

use crate::config::EnvoyConfig;
use crate::error::Result;
use envoy_types::{Payload, Resolver, Value};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{debug, trace};

/// Flat key to payload storage
#[derive(Debug, Clone)]
pub struct ValueStore<K = String> {
    entries: HashMap<K, Payload>,
    resolver: Resolver,
}

impl<K> Default for ValueStore<K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            resolver: Resolver::default(),
        }
    }
}

impl<K> ValueStore<K>
where
    K: Eq + Hash + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &EnvoyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            entries: HashMap::new(),
            resolver: config.resolver(),
        })
    }

    /// Store a value, replacing any previous one, and return it
    pub fn store(&mut self, key: impl Into<K>, value: impl Into<Payload>) -> &Payload {
        let key = key.into();
        debug!(key = ?key, "storing value");
        let slot = self.entries.entry(key).or_default();
        *slot = value.into();
        slot
    }

    /// The stored payload, unresolved
    ///
    /// Returns `None` when the key is absent or holds [`Payload::Unset`].
    pub fn fetch<Q>(&self, key: &Q) -> Option<&Payload>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key).filter(|payload| !payload.is_unset())
    }

    /// The stored payload, or `default` when there is none
    pub fn fetch_or<Q>(&self, key: &Q, default: impl Into<Payload>) -> Payload
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.fetch(key).cloned().unwrap_or_else(|| default.into())
    }

    /// The stored value with every producer inside it resolved
    ///
    /// Returns `Ok(None)` when the key is absent or resolves to `Unset`.
    pub fn rouse<Q>(&self, key: &Q) -> Result<Option<Value>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let Some(payload) = self.entries.get(key) else {
            return Ok(None);
        };
        trace!(key = ?key, deferred = payload.is_deferred(), "rousing value");
        Ok(self.resolver.resolve(payload)?)
    }

    /// Resolved value, or `default` when there is none
    pub fn rouse_or<Q>(&self, key: &Q, default: impl Into<Value>) -> Result<Value>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        Ok(self.rouse(key)?.unwrap_or_else(|| default.into()))
    }

    /// Remove a key; always succeeds, whether or not it was present
    pub fn erase<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let existed = self.entries.remove(key).is_some();
        debug!(key = ?key, existed, "erased value");
        true
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        debug!(keys = self.entries.len(), "clearing stored values");
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> ValueStore {
        ValueStore::new()
    }

    #[test]
    fn test_store_returns_value() {
        let mut values = store();
        let stored = values.store("test_key", "test_val");
        assert_eq!(stored, &Payload::from("test_val"));
    }

    #[test]
    fn test_store_overwrites() {
        let mut values = store();
        values.store("k", 1);
        values.store("k", 2);
        assert_eq!(values.fetch("k"), Some(&Payload::from(2)));
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn test_fetch_accepts_any_value() {
        let mut values = store();
        values.store("bool", false);
        values.store("number", 2600);
        values.store("object", json!({"hello": "there"}));
        values.store("array", json!([1, 2, 3]));
        values.store("null", Value::Null);

        assert_eq!(values.fetch("bool"), Some(&Payload::from(false)));
        assert_eq!(values.fetch("number"), Some(&Payload::from(2600)));
        assert_eq!(
            values.fetch("object"),
            Some(&Payload::from(json!({"hello": "there"})))
        );
        assert_eq!(values.fetch("array"), Some(&Payload::from(json!([1, 2, 3]))));
        assert_eq!(values.fetch("null"), Some(&Payload::Literal(Value::Null)));
    }

    #[test]
    fn test_non_string_keys() {
        let mut values: ValueStore<i64> = ValueStore::new();
        values.store(1337, 2600);
        assert_eq!(values.fetch(&1337i64), Some(&Payload::from(2600)));
    }

    #[test]
    fn test_fetch_does_not_resolve() {
        let mut values = store();
        let producer = Payload::deferred(|| 42);
        values.store("lazy", producer.clone());

        let fetched = values.fetch("lazy").unwrap();
        assert!(fetched.is_deferred());
        assert_eq!(fetched, &producer);
    }

    #[test]
    fn test_fetch_default() {
        let mut values = store();
        assert_eq!(values.fetch_or("absent", "default"), Payload::from("default"));

        values.store("unset", Payload::Unset);
        assert_eq!(values.fetch("unset"), None);
        assert_eq!(values.fetch_or("unset", "default"), Payload::from("default"));
    }

    #[test]
    fn test_rouse_deferred() {
        let mut values = store();
        values.store("k", Payload::deferred(|| 42));
        assert_eq!(values.rouse("k").unwrap(), Some(json!(42)));
    }

    #[test]
    fn test_rouse_nested() {
        let mut values = store();
        values.store(
            "k",
            Payload::map([
                ("a", Payload::deferred(|| 1)),
                ("b", Payload::seq([Payload::deferred(|| 2), Payload::from(3)])),
            ]),
        );

        assert_eq!(values.rouse("k").unwrap(), Some(json!({"a": 1, "b": [2, 3]})));

        // The stored structure itself is untouched
        assert!(matches!(values.fetch("k"), Some(Payload::Map(_))));
    }

    #[test]
    fn test_rouse_default() {
        let mut values = store();
        assert_eq!(values.rouse_or("absent", "default").unwrap(), json!("default"));

        values.store("gone", Payload::deferred(|| Payload::Unset));
        assert_eq!(values.rouse("gone").unwrap(), None);
        assert_eq!(values.rouse_or("gone", 0).unwrap(), json!(0));
    }

    #[test]
    fn test_rouse_error() {
        let mut values = store();
        values.store("k", Payload::try_deferred(|| Err::<i32, _>("unavailable")));
        assert!(values.rouse("k").is_err());
        assert!(values.rouse_or("k", 1).is_err());
    }

    #[test]
    fn test_erase() {
        let mut values = store();
        values.store("test_key", "test_val");

        assert!(values.erase("test_key"));
        assert!(!values.contains_key("test_key"));
        assert_eq!(values.fetch("test_key"), None);

        // Erasing an absent key still reports success
        assert!(values.erase("never_stored"));
    }

    #[test]
    fn test_with_config() {
        let config = EnvoyConfig {
            max_depth: 1,
            log_resolution: false,
        };
        let mut values: ValueStore = ValueStore::with_config(&config).unwrap();
        values.store("k", Payload::deferred(|| Payload::deferred(|| 1)));
        assert!(values.rouse("k").is_err());

        let invalid = EnvoyConfig {
            max_depth: 0,
            log_resolution: false,
        };
        assert!(matches!(
            ValueStore::<String>::with_config(&invalid),
            Err(crate::EnvoyError::Config(_))
        ));
    }

    #[test]
    fn test_clear() {
        let mut values = store();
        values.store("a", 1);
        values.store("b", 2);
        assert_eq!(values.keys().count(), 2);

        values.clear();
        assert!(values.is_empty());
    }
}
