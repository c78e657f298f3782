//! Cancellable one-second countdown.
//!
//! The ticker runs as its own task and publishes the seconds left on a watch channel. It stops
//! at zero, on [`Countdown::cancel`], or when the `Countdown` is dropped.

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct Countdown {
    remaining: watch::Receiver<u64>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Whole seconds in `duration`, rounding any fraction up.
fn whole_seconds(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

/// Render seconds as `mm:ss`.
pub fn format_remaining(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

impl Countdown {
    /// Start counting down from `duration`. Must be called inside a tokio runtime.
    pub fn start(duration: Duration) -> Self {
        let total = whole_seconds(duration);
        let (tx, remaining) = watch::channel(total);
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            if total == 0 {
                return;
            }
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + TICK, TICK);
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        tracing::debug!("countdown cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        let left = tx.borrow().saturating_sub(1);
                        tx.send_replace(left);
                        if left == 0 {
                            tracing::debug!("countdown expired");
                            break;
                        }
                    }
                }
            }
        });

        Self {
            remaining,
            cancel,
            task,
        }
    }

    pub fn remaining_secs(&self) -> u64 {
        *self.remaining.borrow()
    }

    pub fn remaining_label(&self) -> String {
        format_remaining(self.remaining_secs())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_secs() == 0
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.remaining.clone()
    }

    /// Stop ticking; the remaining time freezes at its current value.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Resolve once the countdown reaches zero. Returns early, without reaching zero, if it is
    /// cancelled first.
    pub async fn expired(&self) {
        let mut rx = self.remaining.clone();
        let _ = rx.wait_for(|left| *left == 0).await;
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
