//! Error types for table configuration.

use thiserror::Error;

/// Reasons a table refuses to start.
///
/// Every variant is detected before any actor is spawned; a table that
/// fails validation never exists in a partially built state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The ring is too small for the ordering rule to mean anything.
    #[error("a ring needs at least {min} actors, got {actors}")]
    TooFewActors { actors: usize, min: usize },

    /// A resource index does not name a slot of the ring.
    #[error("resource index {index} is outside a ring of {len} resources")]
    ResourceOutOfRange { index: usize, len: usize },

    /// A seating plan that does not match the ring it is meant for.
    #[error("malformed topology: {0}")]
    MalformedTopology(String),

    /// A duration span with `min_ms > max_ms`.
    #[error("invalid {name} span: min {min_ms}ms exceeds max {max_ms}ms")]
    InvalidSpan {
        name: &'static str,
        min_ms: u64,
        max_ms: u64,
    },

    /// Progress ticks of zero length would never advance.
    #[error("progress tick must be at least 1ms")]
    ZeroProgressTick,

    /// Every actor acquires its resources in the same direction around the
    /// ring, which admits a circular wait.
    #[error("every actor acquires in the same direction around the ring")]
    UniformOrder,

    /// The configuration document could not be parsed.
    #[error("could not parse configuration: {0}")]
    Parse(String),
}
