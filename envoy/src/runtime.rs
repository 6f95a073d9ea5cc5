//! Envoy coordinator
//!
//! [`Envoy`] owns one offer registry and one value store, configured
//! together, and exposes both call surfaces. Consumers that need to share a
//! single instance receive a [`SharedEnvoy`] handle instead of reaching for
//! global state.

use crate::config::EnvoyConfig;
use crate::error::Result;
use crate::offer::{Deliver, OfferRegistry, Solicitation};
use crate::store::ValueStore;
use envoy_types::{Payload, Value};
use parking_lot::RwLock;
use std::borrow::Borrow;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// A reference-counted, lock-protected [`Envoy`] that can be handed to every
/// consumer in a process
pub type SharedEnvoy<K = String, N = String> = Arc<RwLock<Envoy<K, N>>>;

/// Offer registry and value store behind one handle
///
/// # Example
///
/// ```
/// use envoy::{Envoy, Payload, Solicitation, Solicited};
/// use serde_json::json;
///
/// let mut envoy: Envoy = Envoy::new();
/// envoy.register("greeting", "hello", None);
/// envoy.register("greeting", Payload::deferred(|| "bonjour"), Some("fr".to_string()));
///
/// let french = envoy.solicit(
///     "greeting",
///     Solicitation::new().namespace("fr").first_result(),
/// )?;
/// assert_eq!(french, Some(Solicited::First(Some(json!("bonjour")))));
///
/// envoy.store("answer", Payload::deferred(|| 42));
/// assert_eq!(envoy.rouse("answer")?, Some(json!(42)));
/// # Ok::<(), envoy::EnvoyError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Envoy<K = String, N = String> {
    config: EnvoyConfig,
    offers: OfferRegistry<K, N>,
    storage: ValueStore<K>,
}

impl<K, N> Default for Envoy<K, N> {
    fn default() -> Self {
        Self {
            config: EnvoyConfig::default(),
            offers: OfferRegistry::default(),
            storage: ValueStore::default(),
        }
    }
}

impl<K, N> Envoy<K, N>
where
    K: Eq + Hash + Debug,
    N: PartialEq + Debug,
{
    /// Create an envoy with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an envoy with the given configuration
    pub fn with_config(config: EnvoyConfig) -> Result<Self> {
        let offers = OfferRegistry::with_config(&config)?;
        let storage = ValueStore::with_config(&config)?;
        tracing::debug!(
            max_depth = config.max_depth,
            log_resolution = config.log_resolution,
            "creating envoy"
        );
        Ok(Self {
            config,
            offers,
            storage,
        })
    }

    /// Wrap this envoy for sharing across consumers
    pub fn into_shared(self) -> SharedEnvoy<K, N> {
        Arc::new(RwLock::new(self))
    }

    pub fn config(&self) -> &EnvoyConfig {
        &self.config
    }

    /// The offer registry
    pub fn offers(&self) -> &OfferRegistry<K, N> {
        &self.offers
    }

    pub fn offers_mut(&mut self) -> &mut OfferRegistry<K, N> {
        &mut self.offers
    }

    /// The value store
    pub fn storage(&self) -> &ValueStore<K> {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut ValueStore<K> {
        &mut self.storage
    }

    /// See [`OfferRegistry::register`]
    pub fn register(
        &mut self,
        key: impl Into<K>,
        payload: impl Into<Payload>,
        namespace: Option<N>,
    ) {
        self.offers.register(key, payload, namespace);
    }

    /// See [`OfferRegistry::withdraw`]
    pub fn withdraw<Q>(&mut self, key: &Q, namespace: Option<&N>) -> Option<bool>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        self.offers.withdraw(key, namespace)
    }

    /// See [`OfferRegistry::solicit`]
    pub fn solicit<Q, C>(
        &self,
        key: &Q,
        solicitation: Solicitation<N, C>,
    ) -> Result<Option<C::Output>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
        C: Deliver,
    {
        self.offers.solicit(key, solicitation)
    }

    /// See [`ValueStore::store`]
    pub fn store(&mut self, key: impl Into<K>, value: impl Into<Payload>) -> &Payload {
        self.storage.store(key, value)
    }

    /// See [`ValueStore::fetch`]
    pub fn fetch<Q>(&self, key: &Q) -> Option<&Payload>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.storage.fetch(key)
    }

    /// See [`ValueStore::fetch_or`]
    pub fn fetch_or<Q>(&self, key: &Q, default: impl Into<Payload>) -> Payload
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.storage.fetch_or(key, default)
    }

    /// See [`ValueStore::rouse`]
    pub fn rouse<Q>(&self, key: &Q) -> Result<Option<Value>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        self.storage.rouse(key)
    }

    /// See [`ValueStore::rouse_or`]
    pub fn rouse_or<Q>(&self, key: &Q, default: impl Into<Value>) -> Result<Value>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        self.storage.rouse_or(key, default)
    }

    /// See [`ValueStore::erase`]
    pub fn erase<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        self.storage.erase(key)
    }

    /// Get statistics about the envoy
    pub fn stats(&self) -> EnvoyStats {
        EnvoyStats {
            offer_keys: self.offers.len(),
            offers: self.offers.offer_count(),
            stored_keys: self.storage.len(),
        }
    }
}

/// Statistics about an envoy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvoyStats {
    /// Number of keys with at least one offer
    pub offer_keys: usize,
    /// Total offers across all keys
    pub offers: usize,
    /// Number of keys in the value store
    pub stored_keys: usize,
}
