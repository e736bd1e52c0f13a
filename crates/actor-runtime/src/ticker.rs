/// Periodic tick source for countdown displays
///
/// A ticker is a cancellable tokio task that sends a unit message on a
/// bounded channel at a fixed interval. The UI drains the channel each
/// frame and advances its countdown per tick.
use futures_channel::mpsc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::MissedTickBehavior;

/// Handle to cancel a running ticker
///
/// When dropped or explicitly cancelled, the ticker task stops sending and
/// exits at its next interval boundary, so no ticks arrive after an
/// operation that stopped the countdown.
#[derive(Clone)]
pub struct TickerHandle {
    cancelled: Arc<AtomicBool>,
}

impl TickerHandle {
    fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Cancel the ticker, preventing further ticks
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        // Auto-cancel when handle is dropped
        self.cancel();
    }
}

/// Spawn a ticker task sending `()` on `tick_tx` every `interval_ms`
///
/// Returns a TickerHandle used to stop it. The task also exits when the
/// receiving side is dropped. A full channel drops the tick rather than
/// queueing a burst for a stalled consumer.
///
/// Must be called from within a tokio runtime context.
pub fn spawn_ticker(tick_tx: mpsc::Sender<()>, interval_ms: u64) -> TickerHandle {
    let handle = TickerHandle::new();
    let cancel_flag = handle.cancelled.clone();
    let mut tick_tx = tick_tx;

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tokio::time::Duration::from_millis(interval_ms));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first interval tick resolves immediately; consume it so the
        // first real tick lands one interval after start.
        interval.tick().await;

        loop {
            interval.tick().await;
            if cancel_flag.load(Ordering::Acquire) {
                return;
            }
            if let Err(e) = tick_tx.try_send(()) {
                if e.is_disconnected() {
                    return;
                }
                // Receiver backlogged; skip this tick.
            }
        }
    });

    handle
}
