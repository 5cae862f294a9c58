//! # Resource Ring
//!
//! `N` exclusively-held resources arranged in a cycle.
//!
//! Each slot is a small monitor: a [`tokio::sync::Mutex`] guarding the slot's
//! state and a [`tokio::sync::Notify`] acting as its wait condition. No two
//! slots share a lock, so actors on opposite sides of the ring never contend.
//!
//! ## Waiting without lost wakeups
//!
//! A waiter registers interest in the slot's `Notify` *before* it takes the
//! lock to check `in_use`. A release that lands between the check and the
//! suspension therefore still wakes it. Releases broadcast with
//! `notify_waiters`, and every woken waiter re-checks the predicate under the
//! lock, so a spurious or stale wake just goes back to waiting.
//!
//! ## Events
//!
//! Every transition bumps the slot's `seq` under the lock, then emits one
//! [`RingEvent`] to the observer after the lock is released.

use super::signal::StopSignal;
use crate::config::{ConfigError, MIN_ACTORS};
use crate::model::{ActorId, ResourceIndex, RingEvent};
use crate::observers::Observer;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct SlotState {
    in_use: bool,
    holder: Option<ActorId>,
    seq: u64,
}

#[derive(Debug, Default)]
struct Slot {
    state: Mutex<SlotState>,
    available: Notify,
}

/// Outcome of [`ResourceRing::acquire`].
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquire {
    /// The caller now holds the resource and must release it.
    Acquired,
    /// The stop signal fired while waiting; nothing is held.
    Cancelled,
}

/// Point-in-time view of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceStatus {
    pub index: ResourceIndex,
    pub in_use: bool,
    pub holder: Option<ActorId>,
    pub seq: u64,
}

/// The ring of shared resources.
///
/// Owned once (behind an `Arc`) and addressed only through
/// [`ResourceIndex`] values it hands out.
pub struct ResourceRing {
    slots: Vec<Slot>,
    observer: Arc<dyn Observer>,
}

impl ResourceRing {
    /// Builds a ring of `len` free resources.
    pub fn new(len: usize, observer: Arc<dyn Observer>) -> Result<Self, ConfigError> {
        if len < MIN_ACTORS {
            return Err(ConfigError::TooFewActors {
                actors: len,
                min: MIN_ACTORS,
            });
        }
        let slots = (0..len).map(|_| Slot::default()).collect();
        Ok(Self { slots, observer })
    }

    /// Number of resources, which is also the number of seats.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false for a constructed ring.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Validates a raw slot number.
    pub fn index(&self, index: usize) -> Result<ResourceIndex, ConfigError> {
        if index < self.slots.len() {
            Ok(ResourceIndex(index))
        } else {
            Err(ConfigError::ResourceOutOfRange {
                index,
                len: self.slots.len(),
            })
        }
    }

    fn slot(&self, index: ResourceIndex) -> &Slot {
        &self.slots[index.0]
    }

    /// Blocks until `index` is free, then marks it held by `actor`.
    ///
    /// Returns [`Acquire::Cancelled`] if `stop` fires while the resource is
    /// busy. A free resource is taken even after stop; only the wait is
    /// cancellable.
    pub async fn acquire(
        &self,
        index: ResourceIndex,
        actor: ActorId,
        stop: &mut StopSignal,
    ) -> Acquire {
        let slot = self.slot(index);

        let seq = loop {
            let notified = slot.available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = slot.state.lock().await;
                if !state.in_use {
                    state.in_use = true;
                    state.holder = Some(actor);
                    state.seq += 1;
                    break state.seq;
                }
            }

            let woken = tokio::select! {
                _ = &mut notified => true,
                _ = stop.stopped() => false,
            };
            if !woken {
                debug!(%actor, %index, "Wait cancelled");
                return Acquire::Cancelled;
            }
        };

        debug!(%actor, %index, seq, "Acquired");
        self.observer.notify(RingEvent::ResourceAcquired {
            resource: index,
            actor,
            seq,
        });
        Acquire::Acquired
    }

    /// Frees `index` and wakes every actor waiting on it.
    pub async fn release(&self, index: ResourceIndex, actor: ActorId) {
        let slot = self.slot(index);

        let seq = {
            let mut state = slot.state.lock().await;
            if state.holder != Some(actor) {
                warn!(%actor, %index, holder = ?state.holder, "Release by non-holder");
            }
            state.in_use = false;
            state.holder = None;
            state.seq += 1;
            state.seq
        };
        slot.available.notify_waiters();

        debug!(%actor, %index, seq, "Released");
        self.observer
            .notify(RingEvent::ResourceReleased { resource: index, seq });
    }

    /// Whether `index` is currently held by anyone.
    pub async fn is_held(&self, index: ResourceIndex) -> bool {
        self.slot(index).state.lock().await.in_use
    }

    /// Reads every slot, one lock at a time.
    ///
    /// The result is not a consistent cut across slots while actors are
    /// running; after all actors have joined it is exact.
    pub async fn snapshot(&self) -> Vec<ResourceStatus> {
        let mut statuses = Vec::with_capacity(self.slots.len());
        for (i, slot) in self.slots.iter().enumerate() {
            let state = slot.state.lock().await;
            statuses.push(ResourceStatus {
                index: ResourceIndex(i),
                in_use: state.in_use,
                holder: state.holder,
                seq: state.seq,
            });
        }
        statuses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::StopHandle;
    use crate::observers::RecordingObserver;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{OnceLock, Weak};
    use std::time::Duration;

    /// Checks, from inside `notify`, that the event's slot is already unlocked.
    #[derive(Default)]
    struct LockCheckingObserver {
        ring: OnceLock<Weak<ResourceRing>>,
        checked: AtomicUsize,
        held: AtomicUsize,
    }

    impl Observer for LockCheckingObserver {
        fn notify(&self, event: RingEvent) {
            let (Some(resource), Some(ring)) = (
                event.resource(),
                self.ring.get().and_then(Weak::upgrade),
            ) else {
                return;
            };
            self.checked.fetch_add(1, Ordering::SeqCst);
            if ring.slot(resource).state.try_lock().is_err() {
                self.held.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn ring(len: usize) -> (Arc<ResourceRing>, Arc<RecordingObserver>) {
        let recorder = Arc::new(RecordingObserver::new());
        let ring = ResourceRing::new(len, recorder.clone()).expect("Failed to build ring");
        (Arc::new(ring), recorder)
    }

    #[test]
    fn test_ring_rejects_small_and_out_of_range() {
        let recorder = Arc::new(RecordingObserver::new());
        assert!(matches!(
            ResourceRing::new(2, recorder.clone()),
            Err(ConfigError::TooFewActors { actors: 2, min: 3 })
        ));

        let ring = ResourceRing::new(5, recorder).expect("Failed to build ring");
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.index(4).expect("Failed to index ring").get(), 4);
        assert_eq!(
            ring.index(5),
            Err(ConfigError::ResourceOutOfRange { index: 5, len: 5 })
        );
    }

    #[tokio::test]
    async fn test_acquire_release_emits_ordered_events() {
        let (ring, recorder) = ring(3);
        let stop = StopHandle::new();
        let mut signal = stop.signal();
        let r1 = ring.index(1).expect("Failed to index ring");

        assert_eq!(
            ring.acquire(r1, ActorId(0), &mut signal).await,
            Acquire::Acquired
        );
        assert!(ring.is_held(r1).await);
        ring.release(r1, ActorId(0)).await;
        assert!(!ring.is_held(r1).await);

        assert_eq!(
            recorder.events(),
            vec![
                RingEvent::ResourceAcquired {
                    resource: r1,
                    actor: ActorId(0),
                    seq: 1
                },
                RingEvent::ResourceReleased { resource: r1, seq: 2 },
            ]
        );
    }

    /// Single-threaded, so no other task can be inside a critical section
    /// while `notify` runs.
    #[tokio::test]
    async fn test_events_emitted_after_unlock() {
        let observer = Arc::new(LockCheckingObserver::default());
        let ring = Arc::new(
            ResourceRing::new(3, observer.clone()).expect("Failed to build ring"),
        );
        let _ = observer.ring.set(Arc::downgrade(&ring));
        let stop = StopHandle::new();

        let mut workers = Vec::new();
        for id in 0..3usize {
            let ring = ring.clone();
            let mut signal = stop.signal();
            workers.push(tokio::spawn(async move {
                let index = ring.index(1).expect("Failed to index ring");
                for _ in 0..50 {
                    if ring.acquire(index, ActorId(id), &mut signal).await == Acquire::Acquired {
                        tokio::task::yield_now().await;
                        ring.release(index, ActorId(id)).await;
                    }
                }
            }));
        }
        for worker in workers {
            worker.await.expect("Failed to join worker");
        }

        assert_eq!(observer.checked.load(Ordering::SeqCst), 300);
        assert_eq!(
            observer.held.load(Ordering::SeqCst),
            0,
            "an event was emitted while its slot was locked"
        );
    }

    #[tokio::test]
    async fn test_waiter_blocks_until_release() {
        let (ring, _recorder) = ring(3);
        let stop = StopHandle::new();
        let r0 = ring.index(0).expect("Failed to index ring");

        let mut signal = stop.signal();
        let _ = ring.acquire(r0, ActorId(0), &mut signal).await;

        let waiter_ring = ring.clone();
        let mut waiter_signal = stop.signal();
        let waiter = tokio::spawn(async move {
            waiter_ring
                .acquire(r0, ActorId(2), &mut waiter_signal)
                .await
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished(), "waiter got a held resource");

        ring.release(r0, ActorId(0)).await;
        let outcome = tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .expect("waiter never woke")
            .expect("Failed to join waiter");
        assert_eq!(outcome, Acquire::Acquired);

        let status = &ring.snapshot().await[0];
        assert!(status.in_use);
        assert_eq!(status.holder, Some(ActorId(2)));
        assert_eq!(status.seq, 3);
    }

    #[tokio::test]
    async fn test_release_wakes_every_waiter_but_one_wins() {
        let (ring, _recorder) = ring(4);
        let stop = StopHandle::new();
        let r2 = ring.index(2).expect("Failed to index ring");

        let mut signal = stop.signal();
        let _ = ring.acquire(r2, ActorId(1), &mut signal).await;

        let mut waiters = Vec::new();
        for id in [2usize, 3] {
            let ring = ring.clone();
            let mut signal = stop.signal();
            waiters.push(tokio::spawn(async move {
                let outcome = ring.acquire(r2, ActorId(id), &mut signal).await;
                if outcome == Acquire::Acquired {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    ring.release(r2, ActorId(id)).await;
                }
                outcome
            }));
        }

        tokio::time::sleep(Duration::from_millis(20)).await;
        ring.release(r2, ActorId(1)).await;

        for waiter in waiters {
            let outcome = tokio::time::timeout(Duration::from_secs(5), waiter)
                .await
                .expect("a waiter was never woken")
                .expect("Failed to join waiter");
            assert_eq!(outcome, Acquire::Acquired);
        }
        assert!(!ring.is_held(r2).await);
    }

    #[tokio::test]
    async fn test_stop_cancels_wait() {
        let (ring, recorder) = ring(3);
        let stop = StopHandle::new();
        let r0 = ring.index(0).expect("Failed to index ring");

        let mut signal = stop.signal();
        let _ = ring.acquire(r0, ActorId(0), &mut signal).await;

        let waiter_ring = ring.clone();
        let mut waiter_signal = stop.signal();
        let waiter = tokio::spawn(async move {
            waiter_ring
                .acquire(r0, ActorId(2), &mut waiter_signal)
                .await
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        stop.stop();

        let outcome = tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .expect("stop did not cancel the wait")
            .expect("Failed to join waiter");
        assert_eq!(outcome, Acquire::Cancelled);
        assert_eq!(ring.snapshot().await[0].holder, Some(ActorId(0)));
        assert_eq!(recorder.events().len(), 1);
    }

    #[tokio::test]
    async fn test_free_resource_taken_after_stop() {
        let (ring, _recorder) = ring(3);
        let stop = StopHandle::new();
        stop.stop();
        let mut signal = stop.signal();

        let outcome = ring.acquire(ring.index(1).expect("Failed to index ring"), ActorId(1), &mut signal).await;
        assert_eq!(outcome, Acquire::Acquired);
    }
}
