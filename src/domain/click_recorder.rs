//! Non-blocking entry point for click recording.

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{error, warn};

use crate::domain::click_event::ClickEvent;

/// Hands click events to the background worker without waiting.
///
/// [`ClickRecorder::record`] never blocks and never fails: when the queue is
/// full the event is dropped and logged, so the redirect response is never
/// delayed by click persistence.
#[derive(Debug, Clone)]
pub struct ClickRecorder {
    sender: mpsc::Sender<ClickEvent>,
}

impl ClickRecorder {
    pub fn new(sender: mpsc::Sender<ClickEvent>) -> Self {
        Self { sender }
    }

    /// Creates a recorder together with the receiving end of its queue.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ClickEvent>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self::new(sender), receiver)
    }

    /// Enqueues a click for persistence.
    pub fn record(&self, event: ClickEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {
                metrics::counter!("clicks_enqueued_total").increment(1);
            }
            Err(TrySendError::Full(event)) => {
                metrics::counter!("clicks_dropped_total").increment(1);
                warn!(link_id = event.link_id, "Click queue full, dropping click");
            }
            Err(TrySendError::Closed(event)) => {
                metrics::counter!("clicks_dropped_total").increment(1);
                error!(link_id = event.link_id, "Click queue closed, dropping click");
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Free slots left in the queue.
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }
}
