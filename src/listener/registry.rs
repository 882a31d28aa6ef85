//! Fan-out of raw collection snapshots to subscribed listeners.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::document::DocumentError;

/// Encoded snapshot of one collection, shared by all of its listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSnapshot {
    /// Commit sequence that produced this state.
    pub sequence: u64,
    /// JSON-encoded documents, sorted by id.
    pub documents: Vec<Vec<u8>>,
}

struct ListenerSlot {
    collection: String,
    sender: UnboundedSender<Arc<RawSnapshot>>,
}

/// Registry of live listeners, keyed by collection.
///
/// Clone-friendly via Arc. Slots whose subscription was dropped are pruned
/// on the next notification.
#[derive(Clone, Default)]
pub struct ListenerRegistry {
    slots: Arc<Mutex<Vec<ListenerSlot>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener on `collection`, seeding it with `initial`.
    pub fn register(
        &self,
        collection: &str,
        initial: RawSnapshot,
    ) -> Result<UnboundedReceiver<Arc<RawSnapshot>>, DocumentError> {
        let (sender, receiver) = mpsc::unbounded_channel();
        // The receiver is alive, so this send cannot fail.
        let _ = sender.send(Arc::new(initial));

        let mut slots = self
            .slots
            .lock()
            .map_err(|_| DocumentError::Storage("listener registry poisoned".into()))?;
        slots.push(ListenerSlot {
            collection: collection.to_string(),
            sender,
        });

        Ok(receiver)
    }

    /// Deliver `snapshot` to every live listener of `collection`.
    ///
    /// Returns the number of listeners reached.
    pub fn notify(&self, collection: &str, snapshot: RawSnapshot) -> Result<usize, DocumentError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| DocumentError::Storage("listener registry poisoned".into()))?;

        let shared = Arc::new(snapshot);
        let mut delivered = 0;
        slots.retain(|slot| {
            if slot.collection != collection {
                return !slot.sender.is_closed();
            }
            match slot.sender.send(Arc::clone(&shared)) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => false,
            }
        });

        Ok(delivered)
    }

    /// Whether `collection` has at least one live listener.
    pub fn has_listeners(&self, collection: &str) -> bool {
        self.listener_count(collection) > 0
    }

    pub fn listener_count(&self, collection: &str) -> usize {
        self.slots
            .lock()
            .map(|slots| {
                slots
                    .iter()
                    .filter(|slot| slot.collection == collection && !slot.sender.is_closed())
                    .count()
            })
            .unwrap_or(0)
    }
}
