use std::sync::{Mutex, PoisonError};

use tokio::sync::oneshot;

/// Hands out turns in the order tickets were taken.
///
/// Each ticket holds the receiver of its predecessor and the sender its
/// successor waits on. A dropped sender releases the next turn, so a
/// cancelled or failed holder never blocks the queue.
#[derive(Default)]
pub(crate) struct Fifo {
    tail: Mutex<Option<oneshot::Receiver<()>>>,
}

pub(crate) struct Ticket {
    prev: Option<oneshot::Receiver<()>>,
    release: oneshot::Sender<()>,
}

/// Held while it is this ticket's turn; dropping it lets the next one run.
pub(crate) struct Turn {
    _release: oneshot::Sender<()>,
}

impl Fifo {
    /// Take a place in line. Never blocks.
    pub fn ticket(&self) -> Ticket {
        let (release, next) = oneshot::channel();
        let prev = self
            .tail
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(next);
        Ticket { prev, release }
    }
}

impl Ticket {
    /// Wait until every earlier ticket has released its turn.
    pub async fn wait(self) -> Turn {
        if let Some(prev) = self.prev {
            // Err means the predecessor went away, which also releases us.
            let _ = prev.await;
        }
        Turn {
            _release: self.release,
        }
    }
}
