//! Solicitation options and results

use envoy_types::Value;
use serde::Serialize;

/// Values gathered by a solicitation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Solicited {
    /// Every matching offer, resolved, in registration order
    ///
    /// Offers that resolve to `Unset` are reported as `null`. A
    /// `first_result` solicitation with no match also delivers an empty
    /// `All`.
    All(Vec<Value>),
    /// The first matching offer only
    ///
    /// `None` when the first match resolved to `Unset`.
    First(Option<Value>),
}

impl Solicited {
    /// Borrow the first value, whichever shape this is
    pub fn first(&self) -> Option<&Value> {
        match self {
            Solicited::All(values) => values.first(),
            Solicited::First(value) => value.as_ref(),
        }
    }

    /// Flatten into a list of values
    pub fn into_values(self) -> Vec<Value> {
        match self {
            Solicited::All(values) => values,
            Solicited::First(value) => value.into_iter().collect(),
        }
    }

    /// Collapse into a single value: an array for `All`, the value itself
    /// (or `null`) for `First`
    pub fn into_value(self) -> Value {
        match self {
            Solicited::All(values) => Value::Array(values),
            Solicited::First(value) => value.unwrap_or(Value::Null),
        }
    }
}

/// Final step of a solicitation: turns the gathered offers into the caller's
/// result
pub trait Deliver {
    /// What `solicit` hands back
    type Output;

    /// Consume the gathered offers
    fn deliver(self, solicited: Solicited) -> Self::Output;
}

/// Hand the gathered offers back unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Direct;

impl Deliver for Direct {
    type Output = Solicited;

    fn deliver(self, solicited: Solicited) -> Solicited {
        solicited
    }
}

/// Pass the gathered offers through a caller-supplied callback
#[derive(Debug, Clone, Copy)]
pub struct Then<F>(F);

impl<F, R> Deliver for Then<F>
where
    F: FnOnce(Solicited) -> R,
{
    type Output = R;

    fn deliver(self, solicited: Solicited) -> R {
        (self.0)(solicited)
    }
}

/// Options for [`OfferRegistry::solicit`](super::OfferRegistry::solicit)
///
/// Each field is independent and optional:
///
/// - `first_result`: stop at the first matching offer (default: collect all)
/// - `namespace`: only consider offers registered under this namespace
///   (default: every offer under the key)
/// - `result_callback`: what to do with the gathered offers (default:
///   [`Direct`], return them as [`Solicited`])
///
/// The builder methods may be chained in any order.
#[derive(Debug, Clone)]
pub struct Solicitation<N = String, C = Direct> {
    pub first_result: bool,
    pub namespace: Option<N>,
    pub result_callback: C,
}

impl<N> Solicitation<N, Direct> {
    /// A solicitation with every option at its default
    pub fn new() -> Self {
        Self {
            first_result: false,
            namespace: None,
            result_callback: Direct,
        }
    }
}

impl<N> Default for Solicitation<N, Direct> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, C> Solicitation<N, C> {
    /// Deliver only the first matching offer
    pub fn first_result(mut self) -> Self {
        self.first_result = true;
        self
    }

    /// Restrict to offers registered under `namespace`
    pub fn namespace(mut self, namespace: impl Into<N>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Pass the gathered offers through `callback` and return its result
    pub fn then<F, R>(self, callback: F) -> Solicitation<N, Then<F>>
    where
        F: FnOnce(Solicited) -> R,
    {
        Solicitation {
            first_result: self.first_result,
            namespace: self.namespace,
            result_callback: Then(callback),
        }
    }
}
