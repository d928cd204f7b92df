//! Preview readiness signalling
//!
//! An embedded frame loads on its own schedule. The surface that hosts it
//! holds a [`ReadySignal`] and reports content changes or an explicit load
//! completion; the block awaits the matching [`ReadyHandle`] to leave its
//! loading state.
//!
//! ```
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use embed_block::readiness::{channel, Readiness, QUIET_PERIOD};
//!
//! let (signal, handle) = channel(QUIET_PERIOD);
//! signal.complete();
//! assert_eq!(handle.wait().await, Readiness::Completed);
//! # }
//! ```

use std::time::Duration;
use tokio::sync::watch;
use tracing::trace;

/// Time without content changes after which a preview counts as ready
pub const QUIET_PERIOD: Duration = Duration::from_millis(450);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Progress {
    Pending,
    Active,
    Complete,
}

/// How a preview became ready
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The surface reported completion
    Completed,
    /// Content stopped changing for the quiet period
    Settled,
    /// The surface went away before anything happened
    Abandoned,
}

/// Create a linked signal and handle
pub fn channel(quiet_period: Duration) -> (ReadySignal, ReadyHandle) {
    let (tx, rx) = watch::channel(Progress::Pending);
    (ReadySignal { tx }, ReadyHandle { rx, quiet_period })
}

/// Held by the embedding surface
#[derive(Debug)]
pub struct ReadySignal {
    tx: watch::Sender<Progress>,
}

impl ReadySignal {
    /// Report a content change; restarts the quiet period
    pub fn activity(&self) {
        self.tx.send_modify(|progress| {
            if *progress != Progress::Complete {
                *progress = Progress::Active;
            }
        });
    }

    /// Report that the embedded content finished loading
    pub fn complete(self) {
        self.tx.send_replace(Progress::Complete);
    }
}

/// Awaited by the block
#[derive(Debug)]
pub struct ReadyHandle {
    rx: watch::Receiver<Progress>,
    quiet_period: Duration,
}

impl ReadyHandle {
    /// Wait until the preview is ready
    pub async fn wait(mut self) -> Readiness {
        loop {
            let progress = *self.rx.borrow_and_update();
            match progress {
                Progress::Complete => return Readiness::Completed,
                Progress::Pending => {
                    if self.rx.changed().await.is_err() {
                        return Readiness::Abandoned;
                    }
                }
                Progress::Active => {
                    tokio::select! {
                        changed = self.rx.changed() => {
                            if changed.is_err() {
                                return Readiness::Settled;
                            }
                        }
                        _ = tokio::time::sleep(self.quiet_period) => {
                            trace!(quiet_period = ?self.quiet_period, "Preview settled");
                            return Readiness::Settled;
                        }
                    }
                }
            }
        }
    }
}
