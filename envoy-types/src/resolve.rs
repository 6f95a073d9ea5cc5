//! Recursive payload resolution

use crate::error::{ResolveError, Result};
use crate::payload::Payload;
use serde_json::{Map, Value};

/// Default producer chain limit for [`Resolver`]
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Turns payloads into plain values
///
/// Resolution rules:
/// - `Literal` values are cloned as-is
/// - `Deferred` producers are run and their output resolved again
/// - `Seq` and `Map` yield a new structure of the same shape with every
///   element resolved
/// - `Unset` resolves to `None`; inside a sequence it becomes `null`, inside
///   a mapping its entry is dropped
///
/// Only producer hops count towards the depth limit; sequences and mappings
/// of any nesting resolve freely. A producer that keeps returning producers
/// fails with [`ResolveError::DepthExceeded`] instead of recursing forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolver {
    max_depth: usize,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl Resolver {
    /// Create a resolver allowing at most `max_depth` producer hops along
    /// any path
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// The configured depth limit
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Resolve a payload
    ///
    /// Producer failures are returned unmodified; no partial result is kept.
    pub fn resolve(&self, payload: &Payload) -> Result<Option<Value>> {
        self.resolve_at(payload, 0)
    }

    fn resolve_at(&self, payload: &Payload, depth: usize) -> Result<Option<Value>> {
        if depth > self.max_depth {
            tracing::warn!(limit = self.max_depth, "payload resolution exceeded depth limit");
            return Err(ResolveError::DepthExceeded {
                limit: self.max_depth,
            });
        }

        match payload {
            Payload::Unset => Ok(None),
            Payload::Literal(value) => Ok(Some(value.clone())),
            Payload::Deferred(producer) => {
                tracing::trace!(depth, "running producer");
                let produced = producer.produce().map_err(ResolveError::Producer)?;
                self.resolve_at(&produced, depth + 1)
            }
            Payload::Seq(items) => {
                let mut resolved = Vec::with_capacity(items.len());
                for item in items {
                    resolved.push(self.resolve_at(item, depth)?.unwrap_or(Value::Null));
                }
                Ok(Some(Value::Array(resolved)))
            }
            Payload::Map(entries) => {
                let mut resolved = Map::new();
                for (key, entry) in entries {
                    if let Some(value) = self.resolve_at(entry, depth)? {
                        resolved.insert(key.clone(), value);
                    }
                }
                Ok(Some(Value::Object(resolved)))
            }
        }
    }
}
