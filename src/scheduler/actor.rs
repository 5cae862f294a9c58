//! The per-actor lifecycle loop.
//!
//! ```text
//!   Thinking ──► WaitingForResources ──► Eating ──┐
//!      ▲                                          │
//!      └──────────── release both ◄───────────────┘
//! ```
//!
//! Stop is observed before each think, during the think sleep, before each
//! wait and during each wait. It is never observed while eating: an actor
//! that holds both resources always finishes the meal and puts both down.

use super::plan::Seat;
use crate::config::SpanMs;
use crate::framework::{Acquire, ResourceRing, StopSignal};
use crate::model::{ActorId, ActorState, RingEvent};
use crate::observers::Observer;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument};

/// What one actor did before it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorReport {
    pub actor: ActorId,
    pub meals: u64,
    /// Longest time spent in `WaitingForResources` before a meal.
    pub longest_wait: Duration,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Timing {
    pub think: SpanMs,
    pub eat: SpanMs,
    pub tick: Duration,
}

pub struct RingActor {
    seat: Seat,
    ring: Arc<ResourceRing>,
    observer: Arc<dyn Observer>,
    timing: Timing,
    rng: ChaCha8Rng,
    stop: StopSignal,
}

impl RingActor {
    pub(crate) fn new(
        seat: Seat,
        ring: Arc<ResourceRing>,
        observer: Arc<dyn Observer>,
        timing: Timing,
        seed: Option<u64>,
        stop: StopSignal,
    ) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(seat.actor.get() as u64)),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        Self {
            seat,
            ring,
            observer,
            timing,
            rng,
            stop,
        }
    }

    pub fn actor(&self) -> ActorId {
        self.seat.actor
    }

    fn enter(&self, state: ActorState) {
        self.observer.notify(RingEvent::ActorStateChanged {
            actor: self.seat.actor,
            state,
        });
    }

    /// Runs think/wait/eat cycles until the stop signal is observed.
    #[instrument(name = "actor", skip(self), fields(actor = %self.seat.actor))]
    pub async fn run(mut self) -> ActorReport {
        let actor = self.seat.actor;
        let (first, second) = (self.seat.first(), self.seat.second());
        info!(%first, %second, "Actor seated");

        let mut meals = 0;
        let mut longest_wait = Duration::ZERO;

        loop {
            if self.stop.is_stopped() {
                break;
            }
            self.enter(ActorState::Thinking);
            let think = self.timing.think.sample(&mut self.rng);
            if !self.stop.sleep(think).await {
                break;
            }

            if self.stop.is_stopped() {
                break;
            }
            self.enter(ActorState::WaitingForResources);
            let waiting_since = Instant::now();

            if self.ring.acquire(first, actor, &mut self.stop).await == Acquire::Cancelled {
                break;
            }
            if self.ring.acquire(second, actor, &mut self.stop).await == Acquire::Cancelled {
                debug!(%first, "Cancelled holding first resource, putting it down");
                self.ring.release(first, actor).await;
                break;
            }
            longest_wait = longest_wait.max(waiting_since.elapsed());

            self.enter(ActorState::Eating);
            self.eat().await;

            self.ring.release(second, actor).await;
            self.ring.release(first, actor).await;
            meals += 1;
        }

        self.enter(ActorState::Stopped);
        info!(meals, ?longest_wait, "Actor stopped");
        ActorReport {
            actor,
            meals,
            longest_wait,
        }
    }

    async fn eat(&mut self) {
        let tick = self.timing.tick;
        let mut remaining = self.timing.eat.sample(&mut self.rng);
        loop {
            let step = remaining.min(tick);
            pause(step).await;
            remaining -= step;
            self.observer.notify(RingEvent::ActorProgress {
                actor: self.seat.actor,
                remaining_ticks: ticks_in(remaining, tick),
            });
            if remaining.is_zero() {
                break;
            }
        }
    }
}

async fn pause(duration: Duration) {
    if duration.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(duration).await;
    }
}

fn ticks_in(remaining: Duration, tick: Duration) -> u64 {
    remaining.as_millis().div_ceil(tick.as_millis()) as u64
}
