use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, warn};

/// Collapses a burst of edits into one delivery of the latest payload.
///
/// Every `schedule` aborts the pending timer and starts a new one. A
/// generation token is checked before sending, so a timer that already
/// woke up cannot deliver a superseded payload.
pub struct Debouncer<T> {
    delay: Duration,
    to_main: mpsc::Sender<T>,
    generation: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, to_main: mpsc::Sender<T>) -> Debouncer<T> {
        Debouncer {
            delay,
            to_main,
            generation: Arc::new(AtomicU64::new(0)),
            pending: None,
        }
    }

    pub fn schedule(&mut self, payload: T) {
        if let Some(pending) = self.pending.take() {
            if !pending.is_finished() {
                debug!("rescheduling pending save");
            }
            pending.abort();
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let current = self.generation.clone();
        let to_main = self.to_main.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if current.load(Ordering::SeqCst) != generation {
                return;
            }
            if to_main.send(payload).await.is_err() {
                warn!("debounced save dropped, receiver closed");
            }
        }));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.is_finished())
    }
}
