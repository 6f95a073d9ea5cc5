//! Envoy - in-process offer/solicit registry
//!
//! Independent components advertise values or computations under a shared
//! key, and other components collect them on demand without either side
//! knowing about the other.
//!
//! # Core Concepts
//!
//! ## Offers
//!
//! An **offer** is a [`Payload`] registered under a key, optionally tagged
//! with a namespace. Each key keeps its offers in registration order, and
//! that order is the order in which they are solicited. Offers are never
//! modified, only withdrawn.
//!
//! ## Solicitation
//!
//! A **solicitation** resolves the offers under a key and delivers them.
//! Three independent options shape it (see [`Solicitation`]):
//! - `first_result`: stop at the first matching offer
//! - `namespace`: only consider offers in one namespace
//! - `result_callback`: transform the gathered offers before returning
//!
//! ## Stored values
//!
//! The [`ValueStore`] is a flat key-value map. `fetch` returns what was
//! stored; `rouse` resolves every producer inside it first.
//!
//! ## Payloads and resolution
//!
//! A [`Payload`] is either literal data, a deferred [`Producer`], or a nested
//! sequence/mapping of payloads. The registry and the store share a single
//! [`Resolver`], so resolution behaves the same everywhere.
//!
//! # Example
//!
//! ```rust
//! use envoy::{Envoy, Payload, Solicitation, Solicited};
//! use serde_json::json;
//!
//! let mut envoy: Envoy = Envoy::new();
//!
//! envoy.register("menu", "home", None);
//! envoy.register("menu", "settings", Some("admin".to_string()));
//! envoy.register("menu", Payload::deferred(|| "audit log"), Some("admin".to_string()));
//!
//! let all = envoy.solicit("menu", Solicitation::new())?;
//! assert_eq!(
//!     all,
//!     Some(Solicited::All(vec![json!("home"), json!("settings"), json!("audit log")]))
//! );
//!
//! let admin_count = envoy.solicit(
//!     "menu",
//!     Solicitation::new()
//!         .namespace("admin")
//!         .then(|offers: Solicited| offers.into_values().len()),
//! )?;
//! assert_eq!(admin_count, Some(2));
//!
//! envoy.store(
//!     "profile",
//!     Payload::map([
//!         ("name", Payload::deferred(|| "ada")),
//!         ("roles", Payload::seq([Payload::from("admin")])),
//!     ]),
//! );
//! assert_eq!(
//!     envoy.rouse("profile")?,
//!     Some(json!({"name": "ada", "roles": ["admin"]}))
//! );
//! # Ok::<(), envoy::EnvoyError>(())
//! ```

// Modules
pub mod config;
pub mod error;
pub mod offer;
pub mod runtime;
pub mod store;

// Re-exports for convenience
pub use config::{ConfigError, EnvoyConfig};
pub use envoy_types::{BoxError, Payload, Producer, ResolveError, Resolver, Value};
pub use error::{EnvoyError, Result};
pub use offer::{Deliver, Direct, Offer, OfferRegistry, Solicitation, Solicited, Then};
pub use runtime::{Envoy, EnvoyStats, SharedEnvoy};
pub use store::ValueStore;
