use super::Observer;
use crate::model::{ActorState, RingEvent};
use tracing::{debug, info, trace};

/// Renders ring events as log lines.
///
/// State changes to and from eating are `info`, resource traffic is `debug`,
/// eating progress is `trace`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn notify(&self, event: RingEvent) {
        match event {
            RingEvent::ResourceAcquired {
                resource,
                actor,
                seq,
            } => debug!(%actor, %resource, seq, "Picked up"),
            RingEvent::ResourceReleased { resource, seq } => {
                debug!(%resource, seq, "Put down")
            }
            RingEvent::ActorStateChanged { actor, state } => match state {
                ActorState::Eating | ActorState::Stopped => info!(%actor, %state, "State"),
                _ => debug!(%actor, %state, "State"),
            },
            RingEvent::ActorProgress {
                actor,
                remaining_ticks,
            } => trace!(%actor, remaining_ticks, "Eating"),
        }
    }
}
