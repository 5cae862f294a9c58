//! Table configuration.
//!
//! [`TableConfig`] is plain data: it can be built in code with the `with_*`
//! methods or deserialized from JSON with [`TableConfig::from_json`]. Missing
//! fields fall back to the defaults below.
//!
//! ```json
//! { "actors": 7, "think": { "min_ms": 50, "max_ms": 200 }, "order": "alternating" }
//! ```

pub mod error;

pub use error::*;

use crate::scheduler::OrderPolicy;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Smallest ring the ordering rule is defined for.
pub const MIN_ACTORS: usize = 3;

/// An inclusive range of milliseconds from which sleep lengths are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanMs {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl SpanMs {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// A span that always yields the same length.
    pub const fn fixed(ms: u64) -> Self {
        Self::new(ms, ms)
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Duration {
        Duration::from_millis(rng.random_range(self.min_ms..=self.max_ms))
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.min_ms > self.max_ms {
            return Err(ConfigError::InvalidSpan {
                name,
                min_ms: self.min_ms,
                max_ms: self.max_ms,
            });
        }
        Ok(())
    }
}

/// Everything needed to seat and run a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Number of actors, which is also the number of resources.
    pub actors: usize,
    /// How long an actor thinks between meals.
    pub think: SpanMs,
    /// How long an actor holds both resources.
    pub eat: SpanMs,
    /// Length of one `ActorProgress` tick while eating.
    pub progress_tick_ms: u64,
    /// Which actors acquire right-first.
    pub order: OrderPolicy,
    /// Seeds every actor's RNG (`seed + actor id`) for repeatable runs.
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            actors: 5,
            think: SpanMs::new(100, 400),
            eat: SpanMs::new(200, 800),
            progress_tick_ms: 100,
            order: OrderPolicy::default(),
            seed: None,
        }
    }
}

impl TableConfig {
    pub fn with_actors(mut self, actors: usize) -> Self {
        self.actors = actors;
        self
    }

    pub fn with_think(mut self, think: SpanMs) -> Self {
        self.think = think;
        self
    }

    pub fn with_eat(mut self, eat: SpanMs) -> Self {
        self.eat = eat;
        self
    }

    pub fn with_progress_tick_ms(mut self, ms: u64) -> Self {
        self.progress_tick_ms = ms;
        self
    }

    pub fn with_order(mut self, order: OrderPolicy) -> Self {
        self.order = order;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parses a JSON document and validates the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks everything that can be checked without building the ring.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.actors < MIN_ACTORS {
            return Err(ConfigError::TooFewActors {
                actors: self.actors,
                min: MIN_ACTORS,
            });
        }
        self.think.validate("think")?;
        self.eat.validate("eat")?;
        if self.progress_tick_ms == 0 {
            return Err(ConfigError::ZeroProgressTick);
        }
        Ok(())
    }

    pub fn progress_tick(&self) -> Duration {
        Duration::from_millis(self.progress_tick_ms)
    }
}
