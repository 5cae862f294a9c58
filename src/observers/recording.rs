//! # Recording Observer
//!
//! An in-memory event log for tests.
//!
//! Hand an `Arc<RecordingObserver>` to a table, run it, then inspect the log
//! or call the `verify_*` helpers, which panic with a description of the
//! first violation they find.
//!
//! ```ignore
//! let recorder = Arc::new(RecordingObserver::new());
//! let table = Table::start(config, recorder.clone())?;
//! // ... let it run ...
//! let report = table.shutdown().await?;
//!
//! recorder.verify_mutual_exclusion();
//! recorder.verify_acquisition_order(&seats);
//! ```

use super::Observer;
use crate::model::{ActorId, ActorState, ResourceIndex, RingEvent};
use crate::scheduler::Seat;
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<RingEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn log(&self) -> MutexGuard<'_, Vec<RingEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every event in arrival order.
    pub fn events(&self) -> Vec<RingEvent> {
        self.log().clone()
    }

    /// Events naming `actor`, in the order that actor produced them.
    pub fn actor_events(&self, actor: ActorId) -> Vec<RingEvent> {
        self.log()
            .iter()
            .filter(|event| event.actor() == Some(actor))
            .cloned()
            .collect()
    }

    /// Events for one resource, in lock order.
    pub fn resource_history(&self, resource: ResourceIndex) -> Vec<RingEvent> {
        let mut history: Vec<_> = self
            .log()
            .iter()
            .filter(|event| event.resource() == Some(resource))
            .cloned()
            .collect();
        history.sort_by_key(seq_of);
        history
    }

    /// How many times `actor` started eating.
    pub fn meals(&self, actor: ActorId) -> usize {
        self.actor_events(actor)
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    RingEvent::ActorStateChanged {
                        state: ActorState::Eating,
                        ..
                    }
                )
            })
            .count()
    }

    /// The resources `actor` took, in order, for every wait that ended in a meal.
    pub fn acquisition_pairs(&self, actor: ActorId) -> Vec<(ResourceIndex, ResourceIndex)> {
        let mut pairs = Vec::new();
        let mut taken = Vec::new();
        for event in self.actor_events(actor) {
            match event {
                RingEvent::ActorStateChanged {
                    state: ActorState::WaitingForResources,
                    ..
                } => taken.clear(),
                RingEvent::ResourceAcquired { resource, .. } => taken.push(resource),
                RingEvent::ActorStateChanged {
                    state: ActorState::Eating,
                    ..
                } => {
                    if let [first, second] = taken[..] {
                        pairs.push((first, second));
                    }
                }
                _ => {}
            }
        }
        pairs
    }

    /// Panics unless every resource's history, in lock order, strictly
    /// alternates acquire/release with no gaps in `seq`.
    pub fn verify_mutual_exclusion(&self) {
        let resources: BTreeSet<ResourceIndex> =
            self.log().iter().filter_map(RingEvent::resource).collect();

        for resource in resources {
            let history = self.resource_history(resource);
            let mut holder: Option<ActorId> = None;
            for (position, event) in history.iter().enumerate() {
                let expected_seq = position as u64 + 1;
                assert_eq!(
                    seq_of(event),
                    expected_seq,
                    "{resource}: gap in transition log at {event:?}"
                );
                match (holder, event) {
                    (None, RingEvent::ResourceAcquired { actor, .. }) => holder = Some(*actor),
                    (Some(_), RingEvent::ResourceReleased { .. }) => holder = None,
                    (Some(current), RingEvent::ResourceAcquired { actor, .. }) => panic!(
                        "{resource}: {actor} acquired while {current} still held it (seq {expected_seq})"
                    ),
                    (None, _) => panic!("{resource}: released while free (seq {expected_seq})"),
                    _ => unreachable!("non-resource event in resource history"),
                }
            }
        }
    }

    /// Panics unless every completed acquisition followed the seat's order.
    pub fn verify_acquisition_order(&self, seats: &[Seat]) {
        for seat in seats {
            for (first, second) in self.acquisition_pairs(seat.actor) {
                assert_eq!(
                    (first, second),
                    (seat.first(), seat.second()),
                    "{} acquired out of order",
                    seat.actor
                );
            }
        }
    }
}

impl Observer for RecordingObserver {
    fn notify(&self, event: RingEvent) {
        self.log().push(event);
    }
}

fn seq_of(event: &RingEvent) -> u64 {
    match event {
        RingEvent::ResourceAcquired { seq, .. } | RingEvent::ResourceReleased { seq, .. } => *seq,
        _ => 0,
    }
}
