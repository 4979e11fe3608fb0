//! Stop signaling for graceful job termination.
//!
//! Wraps a tokio watch channel into a stop signal shared between the job
//! executor and its steps. A stop request is observed between chunks only;
//! in-flight chunk commits always run to completion so the transaction
//! boundary is respected.

use tokio::sync::watch;

/// Transmitter side of the stop signal.
#[derive(Debug, Clone)]
pub struct StopTx {
    tx: watch::Sender<bool>,
}

impl StopTx {
    /// Requests a graceful stop of the running job.
    ///
    /// Receivers that already finished are not an error; the request is simply
    /// dropped in that case.
    pub fn stop(&self) {
        let _ = self.tx.send(true);
    }

    /// Creates a new receiver observing this signal.
    pub fn subscribe(&self) -> StopRx {
        StopRx {
            rx: self.tx.subscribe(),
        }
    }
}

/// Receiver side of the stop signal.
#[derive(Debug, Clone)]
pub struct StopRx {
    rx: watch::Receiver<bool>,
}

impl StopRx {
    /// Returns whether a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }
}

/// Creates a new stop signal channel.
///
/// The channel starts in the "not stopped" state.
pub fn create_stop_channel() -> (StopTx, StopRx) {
    let (tx, rx) = watch::channel(false);
    (StopTx { tx }, StopRx { rx })
}
