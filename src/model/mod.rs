//! Pure data types shared by the ring, the scheduler and the observers.

pub mod event;
pub mod ids;
pub mod state;

pub use event::*;
pub use ids::*;
pub use state::*;
