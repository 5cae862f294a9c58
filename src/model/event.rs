//! Events the core pushes to its [`Observer`](crate::observers::Observer).
//!
//! Delivery is one-way and never blocks the protocol. Events from one actor
//! arrive in the order that actor produced them; across actors there is no
//! delivery order. Resource events carry the `seq` the ring assigned under the
//! resource lock, so sorting a resource's events by `seq` recovers the order
//! in which the lock saw them.

use super::{ActorId, ActorState, ResourceIndex};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RingEvent {
    ResourceAcquired {
        resource: ResourceIndex,
        actor: ActorId,
        seq: u64,
    },
    ResourceReleased {
        resource: ResourceIndex,
        seq: u64,
    },
    ActorStateChanged {
        actor: ActorId,
        state: ActorState,
    },
    ActorProgress {
        actor: ActorId,
        remaining_ticks: u64,
    },
}

impl RingEvent {
    /// The actor that produced this event, if it names one.
    ///
    /// `ResourceReleased` carries only the slot; the releasing actor is the
    /// holder recorded by the matching `ResourceAcquired`.
    pub fn actor(&self) -> Option<ActorId> {
        match self {
            RingEvent::ResourceAcquired { actor, .. }
            | RingEvent::ActorStateChanged { actor, .. }
            | RingEvent::ActorProgress { actor, .. } => Some(*actor),
            RingEvent::ResourceReleased { .. } => None,
        }
    }

    pub fn resource(&self) -> Option<ResourceIndex> {
        match self {
            RingEvent::ResourceAcquired { resource, .. }
            | RingEvent::ResourceReleased { resource, .. } => Some(*resource),
            _ => None,
        }
    }
}
