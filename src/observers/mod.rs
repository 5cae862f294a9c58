//! One-way sinks for [`RingEvent`]s.
//!
//! The core never waits on an observer: [`Observer::notify`] is synchronous,
//! must not block, and is called from many actor tasks at once. Anything
//! slow (rendering, I/O) belongs behind a [`ChannelObserver`].
//!
//! - [`TracingObserver`] - logs each event as a structured `tracing` record
//! - [`ChannelObserver`] - forwards events to an unbounded Tokio channel
//! - [`RecordingObserver`] - keeps every event in memory and checks the log
//! - [`NullObserver`] - discards everything

pub mod channel;
pub mod logging;
pub mod recording;

pub use channel::*;
pub use logging::*;
pub use recording::*;

use crate::model::RingEvent;

/// Receives every event the ring and the actors produce.
pub trait Observer: Send + Sync {
    fn notify(&self, event: RingEvent);
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn notify(&self, _event: RingEvent) {}
}
