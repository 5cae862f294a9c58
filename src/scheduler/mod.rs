//! Actor scheduling: who sits where, in which order they reach, and the
//! tasks that run them.
//!
//! [`ActorScheduler`] owns the seating plan and spawns one Tokio task per
//! actor. There is no coordinator task; actors interact only through the
//! [`ResourceRing`] and the stop signal.

pub mod actor;
pub mod plan;

pub use actor::{ActorReport, RingActor};
pub use plan::*;

use crate::config::{ConfigError, TableConfig};
use crate::framework::{ResourceRing, StopHandle};
use crate::model::ActorId;
use crate::observers::Observer;
use actor::Timing;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

/// A spawned actor.
#[derive(Debug)]
pub struct ActorTask {
    pub actor: ActorId,
    pub handle: JoinHandle<ActorReport>,
}

pub struct ActorScheduler {
    ring: Arc<ResourceRing>,
    seats: Vec<Seat>,
    timing: Timing,
    seed: Option<u64>,
    observer: Arc<dyn Observer>,
}

impl ActorScheduler {
    /// Seats `config.actors` actors around `ring` using `config.order`.
    pub fn new(
        ring: Arc<ResourceRing>,
        config: &TableConfig,
        observer: Arc<dyn Observer>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if ring.len() != config.actors {
            return Err(ConfigError::MalformedTopology(format!(
                "{} actors configured for a ring of {} resources",
                config.actors,
                ring.len()
            )));
        }
        let seats = seat_plan(&ring, config.order)?;
        Self::with_seats(ring, seats, config, observer)
    }

    /// Uses a caller-supplied plan instead of an [`OrderPolicy`].
    ///
    /// The plan is validated against `ring`; `config` supplies timing and seed.
    pub fn with_seats(
        ring: Arc<ResourceRing>,
        seats: Vec<Seat>,
        config: &TableConfig,
        observer: Arc<dyn Observer>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        validate_plan(&ring, &seats)?;
        Ok(Self {
            ring,
            seats,
            timing: Timing {
                think: config.think,
                eat: config.eat,
                tick: config.progress_tick(),
            },
            seed: config.seed,
            observer,
        })
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Spawns every actor on the current Tokio runtime.
    pub fn spawn(self, stop: &StopHandle) -> Vec<ActorTask> {
        self.seats
            .iter()
            .map(|seat| {
                let actor = RingActor::new(
                    *seat,
                    self.ring.clone(),
                    self.observer.clone(),
                    self.timing,
                    self.seed,
                    stop.signal(),
                );
                let id = actor.actor();
                debug!(actor = %id, "Spawning actor");
                ActorTask {
                    actor: id,
                    handle: tokio::spawn(actor.run()),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observers::NullObserver;

    #[test]
    fn test_ring_and_config_must_agree() {
        let ring = Arc::new(ResourceRing::new(4, Arc::new(NullObserver)).expect("Failed to build ring"));
        let config = TableConfig::default().with_actors(5);
        let result = ActorScheduler::new(ring, &config, Arc::new(NullObserver));
        assert!(matches!(result, Err(ConfigError::MalformedTopology(_))));
    }

    #[test]
    fn test_naive_plan_rejected() {
        let ring = Arc::new(ResourceRing::new(5, Arc::new(NullObserver)).expect("Failed to build ring"));
        let config = TableConfig::default();
        let naive: Vec<Seat> = seat_plan(&ring, OrderPolicy::SingleReversal)
            .expect("Failed to seat actors")
            .into_iter()
            .map(|seat| Seat {
                lead: Hand::Left,
                ..seat
            })
            .collect();

        let result = ActorScheduler::with_seats(ring, naive, &config, Arc::new(NullObserver));
        assert!(matches!(result, Err(ConfigError::UniformOrder)));
    }

    #[tokio::test]
    async fn test_spawn_one_task_per_seat() {
        let ring = Arc::new(ResourceRing::new(3, Arc::new(NullObserver)).expect("Failed to build ring"));
        let config = TableConfig::default()
            .with_actors(3)
            .with_think(crate::config::SpanMs::fixed(0))
            .with_eat(crate::config::SpanMs::fixed(0));
        let scheduler = ActorScheduler::new(ring.clone(), &config, Arc::new(NullObserver)).expect("Failed to build scheduler");
        assert_eq!(scheduler.seats().len(), 3);

        let stop = StopHandle::new();
        let tasks = scheduler.spawn(&stop);
        let ids: Vec<usize> = tasks.iter().map(|t| t.actor.get()).collect();
        assert_eq!(ids, vec![0, 1, 2]);

        stop.stop();
        for task in tasks {
            task.handle.await.expect("Failed to join actor");
        }
        assert!(ring.snapshot().await.iter().all(|s| !s.in_use));
    }
}
