use dining_ring::config::TableConfig;
use dining_ring::lifecycle::{Table, TableReport};
use dining_ring::model::{ActorState, RingEvent};
use dining_ring::observers::{ChannelObserver, Observer, RecordingObserver};
use dining_ring::scheduler::Seat;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Anything slower than this is treated as a stalled (deadlocked) ring.
pub const STALL: Duration = Duration::from_secs(60);

pub struct Run {
    pub report: TableReport,
    pub events: Vec<RingEvent>,
    pub seats: Vec<Seat>,
}

impl Run {
    /// Replays the collected events into a recorder for the `verify_*` helpers.
    pub fn recorder(&self) -> RecordingObserver {
        let recorder = RecordingObserver::new();
        for event in &self.events {
            recorder.notify(event.clone());
        }
        recorder
    }
}

/// Starts a table, feeds `done` the per-actor meal counts after every event,
/// and shuts the table down once it returns true.
pub async fn run_until(config: TableConfig, mut done: impl FnMut(&[u64]) -> bool) -> Run {
    let (observer, mut receiver) = ChannelObserver::new();
    let mut meals = vec![0u64; config.actors];
    let table = Table::start(config, Arc::new(observer)).expect("valid config");
    let seats = table.seats().to_vec();

    let mut events = Vec::new();
    timeout(STALL, async {
        while let Some(event) = receiver.recv().await {
            if let RingEvent::ActorStateChanged {
                actor,
                state: ActorState::Eating,
            } = &event
            {
                meals[actor.get()] += 1;
            }
            events.push(event);
            if done(&meals) {
                break;
            }
        }
    })
    .await
    .expect("ring stalled before reaching its target");

    let report = timeout(STALL, table.shutdown())
        .await
        .expect("shutdown stalled")
        .expect("actors joined cleanly");

    timeout(STALL, async {
        while let Some(event) = receiver.recv().await {
            events.push(event);
        }
    })
    .await
    .expect("event channel never closed");

    Run {
        report,
        events,
        seats,
    }
}
