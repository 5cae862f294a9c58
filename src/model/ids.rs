//! Identifiers for actors and ring slots.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one actor seated at the ring, `0..N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub usize);

impl ActorId {
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor_{}", self.0)
    }
}

/// Index of a resource slot in a [`ResourceRing`](crate::framework::ResourceRing).
///
/// Values are minted by [`ResourceRing::index`](crate::framework::ResourceRing::index),
/// which rejects anything outside the ring, so holding a `ResourceIndex` means
/// the slot exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ResourceIndex(pub(crate) usize);

impl ResourceIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for ResourceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resource_{}", self.0)
    }
}
