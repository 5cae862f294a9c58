//! # Dining Ring
//!
//! > **N actors, N shared resources, one ring, no deadlock.**
//!
//! Each actor alternates between thinking (holding nothing) and eating
//! (holding the resource on its left and the resource on its right). Every
//! resource is shared by exactly two neighbours. This crate implements the
//! acquisition protocol that keeps such a ring live and race-free on Tokio.
//!
//! ## 🏗️ Design
//!
//! ### Per-resource monitors
//! Every slot of the [`ResourceRing`](framework::ResourceRing) has its own
//! lock and wait condition. Waiting is blocking, not polling, and a release
//! wakes every waiter on that slot, each of which re-checks before taking it.
//! There is no global lock: actors on opposite sides of the ring eat at the
//! same time.
//!
//! ### Ordering rule
//! If every actor reached for its left resource first, all of them could end
//! up holding one resource and waiting on the next. One actor reaching the
//! other way breaks that cycle. The [`OrderPolicy`](scheduler::OrderPolicy)
//! picks which actors do; plans where everyone leads with the same hand are
//! rejected at construction.
//!
//! ### Cooperative stop
//! A single [`StopHandle`](framework::StopHandle) ends the run. Actors check
//! it before thinking and before waiting and can be woken out of either, but
//! never abandon a meal, so every resource ends up free.
//!
//! ### Observers
//! The core reports what happens as [`RingEvent`](model::RingEvent)s pushed
//! into an [`Observer`](observers::Observer). Rendering and logging live
//! there, outside the protocol.
//!
//! ## 🗺️ Module Tour
//!
//! - [`framework`] - the ring of monitors and the stop signal
//! - [`scheduler`] - seating plan, ordering rule, per-actor lifecycle loop
//! - [`lifecycle`] - [`Table`](lifecycle::Table): start, stop, join; tracing setup
//! - [`observers`] - event sinks, including the recorder used by tests
//! - [`config`] - [`TableConfig`](config::TableConfig) and [`ConfigError`](config::ConfigError)
//! - [`model`] - ids, actor states, events
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Five actors until Ctrl-C
//! RUST_LOG=info cargo run
//!
//! # Seven actors, alternating order, ten seconds
//! RUST_LOG=debug cargo run -- --actors 7 --order alternating --seconds 10
//! ```

pub mod config;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod observers;
pub mod scheduler;
