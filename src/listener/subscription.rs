//! Typed subscription over a collection's snapshot feed.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::document::{Document, DocumentError, DocumentStore};
use crate::ordered::{sort_by_order, Ordered};

use super::registry::RawSnapshot;

/// Full state of a collection as delivered by a listener.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<M> {
    /// Commit sequence that produced this state (0 before any commit).
    pub sequence: u64,
    pub records: Vec<M>,
}

impl<M: Document> Snapshot<M> {
    pub fn ids(&self) -> Vec<&str> {
        self.records.iter().map(|record| record.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A live listener on one collection. Dropping it unsubscribes.
///
/// ## Example
///
/// ```ignore
/// let mut sub = store.subscribe_ordered::<OnboardingSlide>()?;
/// let first = sub.try_next()?.expect("initial snapshot");
/// // ... after another session commits a reorder:
/// if let Some(latest) = sub.drain_latest()? {
///     view.on_snapshot(latest.records);
/// }
/// ```
pub struct Subscription<M> {
    collection: &'static str,
    receiver: UnboundedReceiver<Arc<RawSnapshot>>,
    sort: Option<fn(&mut [M])>,
    _marker: PhantomData<fn() -> M>,
}

impl<M: Document> Subscription<M> {
    pub fn new(receiver: UnboundedReceiver<Arc<RawSnapshot>>) -> Self {
        Self {
            collection: M::COLLECTION,
            receiver,
            sort: None,
            _marker: PhantomData,
        }
    }

    /// Sort every delivered snapshot with `sort` (store order is by id).
    pub fn sorted_by(mut self, sort: fn(&mut [M])) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn collection(&self) -> &'static str {
        self.collection
    }

    /// Next pending snapshot, without blocking.
    pub fn try_next(&mut self) -> Result<Option<Snapshot<M>>, DocumentError> {
        match self.receiver.try_recv() {
            Ok(raw) => self.decode(&raw).map(Some),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => Ok(None),
        }
    }

    /// Wait up to `timeout_ms` for the next snapshot.
    pub fn poll(&mut self, timeout_ms: u64) -> Result<Option<Snapshot<M>>, DocumentError> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);

        loop {
            match self.receiver.try_recv() {
                Ok(raw) => return self.decode(&raw).map(Some),
                Err(TryRecvError::Disconnected) => return Ok(None),
                Err(TryRecvError::Empty) => {}
            }

            if Instant::now() >= deadline {
                return Ok(None);
            }

            std::thread::sleep(Duration::from_millis(1));
        }
    }

    /// Await the next snapshot. Returns None once the store side is gone.
    pub async fn next(&mut self) -> Result<Option<Snapshot<M>>, DocumentError> {
        match self.receiver.recv().await {
            Some(raw) => self.decode(&raw).map(Some),
            None => Ok(None),
        }
    }

    /// Skip every pending snapshot but the newest one.
    pub fn drain_latest(&mut self) -> Result<Option<Snapshot<M>>, DocumentError> {
        let mut latest = None;
        while let Ok(raw) = self.receiver.try_recv() {
            latest = Some(raw);
        }
        latest.map(|raw| self.decode(&raw)).transpose()
    }

    /// Explicit teardown; equivalent to dropping the subscription.
    pub fn unsubscribe(self) {}

    fn decode(&self, raw: &RawSnapshot) -> Result<Snapshot<M>, DocumentError> {
        let mut records = raw
            .documents
            .iter()
            .map(|bytes| serde_json::from_slice::<M>(bytes))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(sort) = self.sort {
            sort(&mut records);
        }

        Ok(Snapshot {
            sequence: raw.sequence,
            records,
        })
    }
}

/// Subscribe with snapshots sorted ascending by `order`.
pub trait OrderedSubscribe: DocumentStore {
    fn subscribe_ordered<M: Document + Ordered>(&self) -> Result<Subscription<M>, DocumentError> {
        Ok(self.subscribe::<M>()?.sorted_by(sort_by_order::<M>))
    }
}

impl<S: DocumentStore> OrderedSubscribe for S {}
