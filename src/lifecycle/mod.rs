//! Runtime orchestration: starting a table, stopping it, and logging setup.
//!
//! - [`Table`] - builds the ring and the scheduler, spawns the actors, joins them
//! - [`setup_tracing`] - installs the `tracing` subscriber

pub mod table;
pub mod tracing;

pub use self::tracing::*;
pub use table::*;
