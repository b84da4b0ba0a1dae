//! "Record changed" channel between form controllers and list controllers.

use shared::domain::RecordKind;
use tokio::sync::broadcast;
use tracing::debug;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
    StatusChanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordChanged {
    pub kind: RecordKind,
    pub id: Option<i64>,
    pub change: ChangeKind,
}

#[derive(Clone)]
pub struct RecordEvents {
    tx: broadcast::Sender<RecordChanged>,
}

impl Default for RecordEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    pub fn publish(&self, event: RecordChanged) {
        if self.tx.send(event).is_err() {
            debug!("record change published with no subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RecordChanged> {
        self.tx.subscribe()
    }
}
