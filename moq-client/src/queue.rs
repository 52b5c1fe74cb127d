//! Multi-producer, single-consumer queue that can be aborted with an error.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

use crate::error::{Error, Result};

struct State<T> {
    items: VecDeque<T>,
    aborted: Option<Error>,
    producers: usize,
}

struct Shared<T> {
    state: Mutex<State<T>>,
    notify: Notify,
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Create a queue with one producer. Clone the producer for more.
pub fn queue<T>() -> (Producer<T>, Consumer<T>) {
    let shared = Arc::new(Shared {
        state: Mutex::new(State {
            items: VecDeque::new(),
            aborted: None,
            producers: 1,
        }),
        notify: Notify::new(),
    });
    (
        Producer {
            shared: shared.clone(),
        },
        Consumer { shared },
    )
}

pub struct Producer<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Producer<T> {
    /// Append an item. Returns false, dropping the item, once the queue has
    /// been aborted.
    pub fn push(&self, item: T) -> bool {
        {
            let mut state = self.shared.lock();
            if state.aborted.is_some() {
                return false;
            }
            state.items.push_back(item);
        }
        self.shared.notify.notify_one();
        true
    }

    /// Fail the queue. Queued items are discarded and every read from now
    /// on returns `err`. Only the first abort takes effect.
    pub fn abort(&self, err: Error) {
        {
            let mut state = self.shared.lock();
            if state.aborted.is_some() {
                return;
            }
            state.aborted = Some(err);
            state.items.clear();
        }
        self.shared.notify.notify_one();
    }
}

impl<T> Clone for Producer<T> {
    fn clone(&self) -> Self {
        self.shared.lock().producers += 1;
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> Drop for Producer<T> {
    fn drop(&mut self) {
        let last = {
            let mut state = self.shared.lock();
            state.producers -= 1;
            state.producers == 0
        };
        if last {
            self.shared.notify.notify_one();
        }
    }
}

pub struct Consumer<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Consumer<T> {
    /// Wait for the next item.
    ///
    /// An abort wins over anything still queued. Returns `Ok(None)` once
    /// every producer is gone and the queue is drained.
    pub async fn next(&mut self) -> Result<Option<T>> {
        loop {
            let notified = self.shared.notify.notified();
            {
                let mut state = self.shared.lock();
                if let Some(err) = &state.aborted {
                    return Err(err.clone());
                }
                if let Some(item) = state.items.pop_front() {
                    return Ok(Some(item));
                }
                if state.producers == 0 {
                    return Ok(None);
                }
            }
            notified.await;
        }
    }
}
