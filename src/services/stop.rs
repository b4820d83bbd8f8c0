//! Cooperative stop signal for long-running page tasks.
//!
//! The terminal animation never finishes on its own. A host that wants to tear
//! it down (or a test that wants a deterministic end) holds a `StopHandle`;
//! the task polls the matching `StopSignal` at every state boundary and races
//! it against every sleep.

use tokio::sync::watch;

/// Owner side: flips the signal once.
#[derive(Debug)]
pub struct StopHandle {
    sender: watch::Sender<bool>,
}

/// Task side: cheap to clone, observed by any number of tasks.
#[derive(Debug, Clone)]
pub struct StopSignal {
    receiver: watch::Receiver<bool>,
}

/// Create a connected handle/signal pair.
pub fn stop_pair() -> (StopHandle, StopSignal) {
    let (sender, receiver) = watch::channel(false);
    (StopHandle { sender }, StopSignal { receiver })
}

impl StopHandle {
    /// Request every task watching this handle to stop.
    pub fn stop(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.sender.borrow()
    }

    /// Another signal connected to this handle.
    pub fn signal(&self) -> StopSignal {
        StopSignal {
            receiver: self.sender.subscribe(),
        }
    }
}

impl StopSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        let (_sender, receiver) = watch::channel(false);
        Self { receiver }
    }

    pub fn is_stopped(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolve once a stop has been requested.
    ///
    /// If the handle is dropped without stopping, this never resolves.
    pub async fn stopped(&mut self) {
        if self.receiver.wait_for(|stopped| *stopped).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
