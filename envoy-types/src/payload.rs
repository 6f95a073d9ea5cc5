//! Tagged payloads: literal data or deferred computations

use crate::error::BoxError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

type ProduceFn = dyn Fn() -> Result<Payload, BoxError> + Send + Sync;

/// A zero-argument computation that yields a payload on demand
///
/// Producers are reference counted, so cloning a payload never duplicates
/// the underlying closure. Two producers compare equal only when they share
/// the same closure.
#[derive(Clone)]
pub struct Producer(Arc<ProduceFn>);

impl Producer {
    /// Wrap an infallible closure
    pub fn new<F, P>(produce: F) -> Self
    where
        F: Fn() -> P + Send + Sync + 'static,
        P: Into<Payload>,
    {
        Self(Arc::new(move || Ok(produce().into())))
    }

    /// Wrap a closure whose failure should reach the caller of the resolver
    pub fn fallible<F, P, E>(produce: F) -> Self
    where
        F: Fn() -> Result<P, E> + Send + Sync + 'static,
        P: Into<Payload>,
        E: Into<BoxError>,
    {
        Self(Arc::new(move || produce().map(Into::into).map_err(Into::into)))
    }

    /// Run the producer once
    pub fn produce(&self) -> Result<Payload, BoxError> {
        (self.0)()
    }

    /// Check whether two producers share the same closure
    pub fn ptr_eq(&self, other: &Producer) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Producer(..)")
    }
}

impl PartialEq for Producer {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// Something a caller can offer or store
///
/// `Unset` is the absent-marker. It is distinct from `Literal(Value::Null)`:
/// fetching or rousing an `Unset` entry falls back to the caller's default.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    /// No value present
    #[default]
    Unset,
    /// Plain data, returned as-is
    Literal(Value),
    /// A computation run at resolution time
    Deferred(Producer),
    /// A sequence whose elements are resolved independently
    Seq(Vec<Payload>),
    /// A string-keyed mapping whose values are resolved independently
    Map(BTreeMap<String, Payload>),
}

impl Payload {
    /// Literal payload from anything convertible into a [`Value`]
    pub fn literal(value: impl Into<Value>) -> Self {
        Payload::Literal(value.into())
    }

    /// Deferred payload from an infallible closure
    pub fn deferred<F, P>(produce: F) -> Self
    where
        F: Fn() -> P + Send + Sync + 'static,
        P: Into<Payload>,
    {
        Payload::Deferred(Producer::new(produce))
    }

    /// Deferred payload from a fallible closure
    pub fn try_deferred<F, P, E>(produce: F) -> Self
    where
        F: Fn() -> Result<P, E> + Send + Sync + 'static,
        P: Into<Payload>,
        E: Into<BoxError>,
    {
        Payload::Deferred(Producer::fallible(produce))
    }

    /// Sequence payload
    pub fn seq<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Payload>,
    {
        Payload::Seq(items.into_iter().map(Into::into).collect())
    }

    /// Mapping payload
    pub fn map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Payload)>,
        K: Into<String>,
    {
        Payload::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Check for the absent-marker
    pub fn is_unset(&self) -> bool {
        matches!(self, Payload::Unset)
    }

    /// Check whether resolving this payload runs a producer at the top level
    pub fn is_deferred(&self) -> bool {
        matches!(self, Payload::Deferred(_))
    }

    /// Borrow the literal value, if this is a literal
    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Payload::Literal(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Literal(value)
    }
}

impl From<Producer> for Payload {
    fn from(producer: Producer) -> Self {
        Payload::Deferred(producer)
    }
}

impl From<Vec<Payload>> for Payload {
    fn from(items: Vec<Payload>) -> Self {
        Payload::Seq(items)
    }
}

impl From<BTreeMap<String, Payload>> for Payload {
    fn from(entries: BTreeMap<String, Payload>) -> Self {
        Payload::Map(entries)
    }
}

impl<T: Into<Payload>> From<Option<T>> for Payload {
    fn from(value: Option<T>) -> Self {
        value.map_or(Payload::Unset, Into::into)
    }
}

macro_rules! literal_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Payload {
                fn from(value: $ty) -> Self {
                    Payload::Literal(Value::from(value))
                }
            }
        )*
    };
}

literal_from!(bool, i32, i64, u32, u64, f64, &str, String);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unset_is_distinct_from_null() {
        assert!(Payload::Unset.is_unset());
        assert!(!Payload::literal(Value::Null).is_unset());
        assert_ne!(Payload::Unset, Payload::literal(Value::Null));
        assert_eq!(Payload::default(), Payload::Unset);
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(Payload::from(42), Payload::Literal(json!(42)));
        assert_eq!(Payload::from("hi"), Payload::Literal(json!("hi")));
        assert_eq!(Payload::from(true), Payload::Literal(json!(true)));
        assert_eq!(Payload::from(None::<i32>), Payload::Unset);
        assert_eq!(Payload::from(Some(7)), Payload::Literal(json!(7)));
    }

    #[test]
    fn test_producer_identity() {
        let deferred = Payload::deferred(|| 1);
        let cloned = deferred.clone();
        assert_eq!(deferred, cloned);

        // Same closure body, different producer
        assert_ne!(deferred, Payload::deferred(|| 1));
    }

    #[test]
    fn test_fallible_producer_reports_error() {
        let producer = Producer::fallible(|| Err::<i32, _>("boom"));
        let err = producer.produce().unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_nested_builders() {
        let payload = Payload::map([
            ("a", Payload::from(1)),
            ("b", Payload::seq([Payload::from(2), Payload::from(3)])),
        ]);

        let Payload::Map(entries) = &payload else {
            panic!("expected a map payload");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries["b"], Payload::Seq(vec![2.into(), 3.into()]));
        assert!(payload.as_literal().is_none());
    }
}
