//! Shared value model for envoy
//!
//! This crate provides the data that flows through the envoy offer registry
//! and value store:
//!
//! - [`Value`]: plain, fully resolved data
//! - [`Payload`]: what callers hand over, either literal data, a deferred
//!   [`Producer`], or a nested sequence/mapping of further payloads
//! - [`Resolver`]: the single recursive function that turns a payload into a
//!   plain value, running producers as it goes
//!
//! Both the registry and the store resolve through the same [`Resolver`], so a
//! producer behaves identically whether it was offered or stored.

mod error;
mod payload;
mod resolve;

pub use error::{BoxError, ResolveError, Result};
pub use payload::{Payload, Producer};
pub use resolve::{Resolver, DEFAULT_MAX_DEPTH};
pub use serde_json::Value;
