use crate::config::{ConfigError, TableConfig};
use crate::framework::{ResourceRing, ResourceStatus, StopHandle};
use crate::model::ActorId;
use crate::observers::Observer;
use crate::scheduler::{ActorReport, ActorScheduler, ActorTask, Seat};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument};

/// Errors surfaced by a running table.
#[derive(Debug, Error)]
pub enum TableError {
    /// The table could not be built.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An actor task panicked or was aborted instead of returning.
    #[error("{actor} did not finish cleanly: {reason}")]
    ActorPanicked { actor: ActorId, reason: String },
}

/// What the table did between start and shutdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    /// One entry per actor, in seat order.
    pub actors: Vec<ActorReport>,
    /// The ring as it stood after every actor had joined.
    pub resources: Vec<ResourceStatus>,
}

impl TableReport {
    /// Meals eaten by every actor together.
    pub fn total_meals(&self) -> u64 {
        self.actors.iter().map(|a| a.meals).sum()
    }

    /// Meals eaten by `actor`, or `None` if it was not seated.
    pub fn meals(&self, actor: ActorId) -> Option<u64> {
        self.actors.iter().find(|a| a.actor == actor).map(|a| a.meals)
    }

    /// True when no resource was left held.
    pub fn all_released(&self) -> bool {
        self.resources.iter().all(|r| !r.in_use)
    }
}

/// A running ring of actors.
///
/// `Table` is responsible for:
/// - **Construction**: validating the config, building the [`ResourceRing`]
///   and the seating plan, and rejecting bad input before anything runs
/// - **Spawning**: one Tokio task per actor via [`ActorScheduler`]
/// - **Shutdown**: asserting the stop signal and joining every actor
///
/// # Example
///
/// ```ignore
/// let table = Table::start(TableConfig::default(), Arc::new(TracingObserver))?;
///
/// tokio::time::sleep(Duration::from_secs(10)).await;
///
/// let report = table.shutdown().await?;
/// assert!(report.all_released());
/// ```
pub struct Table {
    ring: Arc<ResourceRing>,
    seats: Vec<Seat>,
    stop: StopHandle,
    tasks: Vec<ActorTask>,
}

impl Table {
    /// Validates `config`, seats the actors and starts them.
    ///
    /// Must be called from inside a Tokio runtime. On error nothing has been
    /// spawned.
    #[instrument(skip(config, observer), fields(actors = config.actors))]
    pub fn start(config: TableConfig, observer: Arc<dyn Observer>) -> Result<Self, ConfigError> {
        config.validate()?;

        let ring = Arc::new(ResourceRing::new(config.actors, observer.clone())?);
        let scheduler = ActorScheduler::new(ring.clone(), &config, observer)?;
        let seats = scheduler.seats().to_vec();

        let stop = StopHandle::new();
        let tasks = scheduler.spawn(&stop);

        info!(order = ?config.order, seed = ?config.seed, "Table started");
        Ok(Self {
            ring,
            seats,
            stop,
            tasks,
        })
    }

    /// A handle that can stop this table from anywhere.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Asserts the stop signal. Idempotent.
    pub fn stop(&self) -> bool {
        self.stop.stop()
    }

    /// The shared ring, for inspection while the table runs.
    pub fn ring(&self) -> &Arc<ResourceRing> {
        &self.ring
    }

    /// The seating plan, in actor order.
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Waits for every actor to return.
    ///
    /// This does not stop the table by itself; it resolves once something has
    /// called [`Table::stop`] (or a [`StopHandle`]) and every actor has
    /// finished its current cycle. If an actor task fails, the table is
    /// stopped so the rest can finish, and the first failure is returned.
    pub async fn join(mut self) -> Result<TableReport, TableError> {
        let tasks = std::mem::take(&mut self.tasks);
        let mut actors = Vec::with_capacity(tasks.len());
        let mut failure = None;

        for task in tasks {
            match task.handle.await {
                Ok(report) => actors.push(report),
                Err(e) => {
                    error!(actor = %task.actor, error = %e, "Actor task failed");
                    self.stop.stop();
                    if failure.is_none() {
                        failure = Some(TableError::ActorPanicked {
                            actor: task.actor,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        if let Some(failure) = failure {
            return Err(failure);
        }

        let resources = self.ring.snapshot().await;
        let report = TableReport { actors, resources };
        info!(
            meals = report.total_meals(),
            all_released = report.all_released(),
            "All actors joined"
        );
        Ok(report)
    }

    /// Stops the table and waits for every actor.
    pub async fn shutdown(self) -> Result<TableReport, TableError> {
        info!("Shutting down table...");
        self.stop();
        let report = self.join().await?;
        info!("Table shutdown complete.");
        Ok(report)
    }
}

impl Drop for Table {
    /// Dropping a table stops it, even while [`StopHandle`] clones are alive.
    /// The actors finish their current cycle and exit on their own.
    fn drop(&mut self) {
        if !self.tasks.is_empty() && self.stop.stop() {
            info!("Table dropped, actors told to stop");
        }
    }
}
