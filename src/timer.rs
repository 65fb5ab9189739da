//! Cancellable one-shot deadline timer.
//!
//! The timer does nothing but emit an expiry signal; termination logic
//! lives in the execution engine. Splitting the expiry future from the
//! cancel handle lets the engine poll one inside a `select!` loop while
//! cancelling through the other.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::oneshot;

/// A cancellable one-shot wall-clock timer.
pub struct DeadlineTimer;

impl DeadlineTimer {
    /// Arm a timer that fires once after `duration`.
    ///
    /// If `duration` is `None` or zero, the timer is never armed and the
    /// returned [`Expiry`] stays pending forever. Cancelling (or dropping
    /// the [`CancelHandle`]) before expiry suppresses the signal.
    pub fn start(duration: Option<Duration>) -> (Expiry, CancelHandle) {
        let (fire_tx, fire_rx) = oneshot::channel();
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

        if let Some(duration) = duration.filter(|d| !d.is_zero()) {
            tokio::spawn(async move {
                tokio::select! {
                    _ = tokio::time::sleep(duration) => {
                        let _ = fire_tx.send(());
                    }
                    _ = cancel_rx => {}
                }
            });
        }
        // Unarmed: fire_tx drops here and the Expiry never resolves.

        (
            Expiry { rx: Some(fire_rx) },
            CancelHandle {
                tx: Some(cancel_tx),
            },
        )
    }
}

/// Future side of a [`DeadlineTimer`]: resolves exactly once on expiry.
///
/// Stays pending forever when the timer was never armed or was cancelled.
pub struct Expiry {
    rx: Option<oneshot::Receiver<()>>,
}

impl Future for Expiry {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let Some(rx) = self.rx.as_mut() else {
            return Poll::Pending;
        };
        match Pin::new(rx).poll(cx) {
            Poll::Ready(Ok(())) => {
                self.rx = None;
                Poll::Ready(())
            }
            // Sender dropped: timer was unarmed or cancelled.
            Poll::Ready(Err(_)) => {
                self.rx = None;
                Poll::Pending
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Cancel side of a [`DeadlineTimer`].
pub struct CancelHandle {
    tx: Option<oneshot::Sender<()>>,
}

impl CancelHandle {
    /// Cancel the timer. Idempotent; safe to call after the timer fired.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.tx.take() {
            // Fails if the timer task already fired and exited; that is fine.
            let _ = tx.send(());
        }
    }
}
