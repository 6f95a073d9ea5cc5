//! Offer registry
//!
//! Components advertise payloads under a shared key with [`OfferRegistry::register`]
//! and other components collect them with [`OfferRegistry::solicit`]. Each key
//! holds an ordered list of offers; registration order is retrieval order.
//! An optional namespace tags each offer so that solicitations and
//! withdrawals can target a subset of the offers under a key.

mod solicit;

pub use solicit::{Deliver, Direct, Solicitation, Solicited, Then};

use crate::config::EnvoyConfig;
use crate::error::Result;
use envoy_types::{Payload, Resolver, Value};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{debug, trace};

/// A registered payload and the namespace it was registered under
#[derive(Debug, Clone, PartialEq)]
pub struct Offer<N = String> {
    payload: Payload,
    namespace: Option<N>,
}

impl<N> Offer<N> {
    /// Create an offer
    pub fn new(payload: impl Into<Payload>, namespace: Option<N>) -> Self {
        Self {
            payload: payload.into(),
            namespace,
        }
    }

    /// The offered payload
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The namespace, or `None` when registered without one
    pub fn namespace(&self) -> Option<&N> {
        self.namespace.as_ref()
    }
}

impl<N: PartialEq> Offer<N> {
    /// Check whether this offer passes a namespace filter
    ///
    /// No filter accepts every offer. A filter accepts only offers whose
    /// namespace is exactly equal to it; offers without a namespace never
    /// pass a filter.
    pub fn matches(&self, filter: Option<&N>) -> bool {
        match filter {
            None => true,
            Some(namespace) => self.namespace.as_ref() == Some(namespace),
        }
    }
}

/// Ordered, namespaced offers per key
///
/// Invariant: a key present in the table always maps to at least one offer.
#[derive(Debug, Clone)]
pub struct OfferRegistry<K = String, N = String> {
    offers: HashMap<K, Vec<Offer<N>>>,
    resolver: Resolver,
    log_resolution: bool,
}

impl<K, N> Default for OfferRegistry<K, N> {
    fn default() -> Self {
        Self {
            offers: HashMap::new(),
            resolver: Resolver::default(),
            log_resolution: false,
        }
    }
}

impl<K, N> OfferRegistry<K, N>
where
    K: Eq + Hash + Debug,
    N: PartialEq + Debug,
{
    /// Create an empty registry with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry using the given configuration
    pub fn with_config(config: &EnvoyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            offers: HashMap::new(),
            resolver: config.resolver(),
            log_resolution: config.log_resolution,
        })
    }

    /// Append an offer to the key's list
    ///
    /// Nothing is deduplicated: registering the same payload twice yields two
    /// independent offers.
    pub fn register(
        &mut self,
        key: impl Into<K>,
        payload: impl Into<Payload>,
        namespace: Option<N>,
    ) {
        let key = key.into();
        debug!(key = ?key, namespace = ?namespace, "registering offer");
        self.offers
            .entry(key)
            .or_default()
            .push(Offer::new(payload, namespace));
    }

    /// Remove offers under a key
    ///
    /// Without a namespace every offer under the key is removed. With a
    /// namespace only offers registered under exactly that namespace are
    /// removed; the rest keep their relative order.
    ///
    /// Returns `None` if the key had no offers, otherwise whether anything
    /// was removed. A key whose last offer is withdrawn disappears.
    pub fn withdraw<Q>(&mut self, key: &Q, namespace: Option<&N>) -> Option<bool>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let Some(namespace) = namespace else {
            let removed = self.offers.remove(key)?;
            debug!(key = ?key, count = removed.len(), "withdrew all offers");
            return Some(true);
        };

        let offers = self.offers.get_mut(key)?;
        let before = offers.len();
        offers.retain(|offer| offer.namespace.as_ref() != Some(namespace));
        let removed = before - offers.len();

        if offers.is_empty() {
            self.offers.remove(key);
        }

        debug!(key = ?key, namespace = ?namespace, count = removed, "withdrew offers");
        Some(removed > 0)
    }

    /// Resolve the offers under a key
    ///
    /// Matching offers are resolved in registration order. With
    /// `first_result` the scan stops at the first match, so producers of later
    /// offers never run, and a scan with no match delivers an empty
    /// [`Solicited::All`]. The gathered offers are then passed to the
    /// solicitation's result callback and its output is returned.
    ///
    /// A key with no offers returns `Ok(None)` without invoking the result
    /// callback, even when one was supplied. A key whose offers all miss the
    /// namespace filter still reaches the callback, with an empty result.
    ///
    /// A producer failure aborts the scan and is returned as the error.
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
        let Some(offers) = self.offers.get(key) else {
            trace!(key = ?key, "no offers to solicit");
            return Ok(None);
        };

        let Solicitation {
            first_result,
            namespace,
            result_callback,
        } = solicitation;

        trace!(key = ?key, namespace = ?namespace, first_result, "soliciting offers");

        let mut matching = offers.iter().filter(|offer| offer.matches(namespace.as_ref()));

        let solicited = if first_result {
            match matching.next() {
                Some(offer) => Solicited::First(self.resolve_offer(offer)?),
                None => Solicited::All(Vec::new()),
            }
        } else {
            let mut values = Vec::new();
            for offer in matching {
                values.push(self.resolve_offer(offer)?.unwrap_or(Value::Null));
            }
            Solicited::All(values)
        };

        Ok(Some(result_callback.deliver(solicited)))
    }

    fn resolve_offer(&self, offer: &Offer<N>) -> Result<Option<Value>> {
        let value = self.resolver.resolve(&offer.payload)?;
        if self.log_resolution {
            trace!(namespace = ?offer.namespace, value = ?value, "resolved offer");
        }
        Ok(value)
    }

    /// The offers under a key, in registration order
    pub fn offers<Q>(&self, key: &Q) -> &[Offer<N>]
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.offers.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Check whether a key has any offers
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.offers.contains_key(key)
    }

    /// Keys with at least one offer
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.offers.keys()
    }

    /// Number of keys with offers
    pub fn len(&self) -> usize {
        self.offers.len()
    }

    /// Check if there are no offers at all
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    /// Total number of offers across all keys
    pub fn offer_count(&self) -> usize {
        self.offers.values().map(Vec::len).sum()
    }

    /// Drop every offer
    pub fn clear(&mut self) {
        debug!(keys = self.offers.len(), "clearing offers");
        self.offers.clear();
    }
}
