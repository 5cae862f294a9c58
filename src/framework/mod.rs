//! Synchronization primitives for the ring.
//!
//! # Main Components
//!
//! - [`ResourceRing`] - `N` per-slot monitors with blocking acquire and broadcast release
//! - [`StopHandle`] / [`StopSignal`] - the process-wide cooperative stop flag
//!
//! Nothing in here knows about thinking or eating; the scheduler builds the
//! actor lifecycle on top of these two pieces.

pub mod ring;
pub mod signal;

pub use ring::*;
pub use signal::*;
