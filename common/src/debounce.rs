// Debounce primitives
//
// `Debouncer` is a clock-injected value holder for event loops that own their
// timers. `debounce_watch` adapts a tokio watch channel for async consumers.

use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Holds the last settled value and at most one pending value.
///
/// A pending value settles once `delay` has passed without another `set`.
/// Each `set` replaces the pending value and restarts the delay, so only the
/// latest input is ever propagated.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    settled: T,
    pending: Option<Pending<T>>,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

impl<T: Clone> Debouncer<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            delay,
            settled: initial,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a new input at `now`, cancelling any pending one
    pub fn set(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            deadline: now + self.delay,
        });
    }

    /// When the pending value will settle, if one is waiting
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Settle the pending value if its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(pending) if pending.deadline <= now => {
                let pending = self.pending.take()?;
                self.settled = pending.value.clone();
                Some(pending.value)
            }
            _ => None,
        }
    }

    /// Drop the pending value without settling it
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Last value that made it through the quiet period
    pub fn settled(&self) -> &T {
        &self.settled
    }
}

/// Debounced view over a watch channel.
///
/// Dropping it aborts the timer task.
#[derive(Debug)]
pub struct Debounced<T> {
    receiver: watch::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T> Debounced<T> {
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.receiver.clone()
    }

    pub fn borrow(&self) -> watch::Ref<'_, T> {
        self.receiver.borrow()
    }

    /// Wait for the next settled value
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.receiver.changed().await
    }
}

impl<T> Drop for Debounced<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Forward values from `source` only after `delay` of quiet.
///
/// If the source closes while a value is pending, that value is still
/// delivered before the output closes.
pub fn debounce_watch<T>(mut source: watch::Receiver<T>, delay: Duration) -> Debounced<T>
where
    T: Clone + Send + Sync + 'static,
{
    let initial = source.borrow_and_update().clone();
    let (tx, receiver) = watch::channel(initial);

    let task = tokio::spawn(async move {
        loop {
            if source.changed().await.is_err() {
                return;
            }

            let mut source_open = true;
            loop {
                tokio::select! {
                    changed = source.changed() => {
                        if changed.is_err() {
                            source_open = false;
                            break;
                        }
                    }
                    _ = tokio::time::sleep(delay) => break,
                }
            }

            let latest = source.borrow_and_update().clone();
            if tx.send(latest).is_err() || !source_open {
                return;
            }
        }
    });

    Debounced { receiver, task }
}
