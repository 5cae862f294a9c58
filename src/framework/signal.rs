//! # Stop Signal
//!
//! The single process-wide stop flag, built on [`tokio::sync::watch`].
//!
//! [`StopHandle`] is the control side: any holder may call
//! [`StopHandle::stop`], any number of times. [`StopSignal`] is the actor side:
//! each actor owns its own receiver and checks it at the boundaries of its
//! state machine, or awaits it alongside a sleep or a resource wait.
//!
//! Dropping every `StopHandle` counts as a stop. A dropped `Table` also
//! asserts the flag itself, so outstanding handle clones do not keep its
//! actors alive.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;

/// Control side of the stop flag.
#[derive(Debug, Clone)]
pub struct StopHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    /// A fresh, unasserted flag.
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Asserts the stop flag.
    ///
    /// Returns `true` only for the call that actually flipped it; later calls
    /// are no-ops.
    pub fn stop(&self) -> bool {
        let flipped = self.sender.send_if_modified(|stopped| {
            if *stopped {
                false
            } else {
                *stopped = true;
                true
            }
        });
        if flipped {
            info!("Stop requested");
        }
        flipped
    }

    /// Whether the flag has been asserted.
    pub fn is_stopped(&self) -> bool {
        *self.sender.borrow()
    }

    /// A new actor-side view of this flag.
    pub fn signal(&self) -> StopSignal {
        StopSignal {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for StopHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Actor side of the stop flag.
#[derive(Debug, Clone)]
pub struct StopSignal {
    receiver: watch::Receiver<bool>,
}

impl StopSignal {
    /// Whether the flag is asserted or every handle has been dropped.
    pub fn is_stopped(&self) -> bool {
        *self.receiver.borrow() || self.receiver.has_changed().is_err()
    }

    /// Resolves once the flag is asserted or every handle is gone.
    pub async fn stopped(&mut self) {
        // An Err means the sender was dropped, which is treated as a stop.
        let _ = self.receiver.wait_for(|stopped| *stopped).await;
    }

    /// Sleeps for `duration` unless stopped first.
    ///
    /// Returns `true` if the full duration elapsed without a stop. A zero
    /// duration yields to the scheduler instead of touching the timer.
    pub async fn sleep(&mut self, duration: Duration) -> bool {
        if duration.is_zero() {
            tokio::task::yield_now().await;
            return !self.is_stopped();
        }
        let elapsed = tokio::select! {
            _ = tokio::time::sleep(duration) => true,
            _ = self.stopped() => false,
        };
        elapsed && !self.is_stopped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let handle = StopHandle::new();
        let signal = handle.signal();
        assert!(!signal.is_stopped());

        assert!(handle.stop());
        assert!(!handle.stop());
        assert!(handle.is_stopped());
        assert!(signal.is_stopped());
    }

    #[tokio::test]
    async fn test_sleep_cut_short_by_stop() {
        let handle = StopHandle::new();
        let mut signal = handle.signal();

        let stopper = handle.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            stopper.stop();
        });

        let finished = tokio::time::timeout(
            Duration::from_secs(5),
            signal.sleep(Duration::from_secs(60)),
        )
        .await
        .expect("sleep was not interrupted");
        assert!(!finished);
    }

    #[tokio::test]
    async fn test_sleep_completes_without_stop() {
        let handle = StopHandle::new();
        let mut signal = handle.signal();
        assert!(signal.sleep(Duration::from_millis(1)).await);
        assert!(signal.sleep(Duration::ZERO).await);
    }

    #[tokio::test]
    async fn test_dropping_every_handle_counts_as_stop() {
        let handle = StopHandle::new();
        let mut signal = handle.signal();
        drop(handle);

        assert!(signal.is_stopped());
        tokio::time::timeout(Duration::from_secs(5), signal.stopped())
            .await
            .expect("stopped() did not resolve after the handle was dropped");
    }
}
