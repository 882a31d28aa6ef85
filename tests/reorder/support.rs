//! Test domain: a derived `Card` document and a store that can refuse batches.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use filter_cms::{
    Document, DocumentError, DocumentStore, InMemoryDocumentStore, Subscription, Versioned,
    WriteBatch,
};
use serde::{Deserialize, Serialize};

/// A board card, ordered within its collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
pub struct Card {
    pub id: String,
    pub title: String,
    #[document(order)]
    pub order: u32,
}

impl Card {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: id.to_uppercase(),
            order: 0,
        }
    }
}

/// Seed cards in the given order through the creation rule.
pub fn seed_cards<S: DocumentStore>(store: &S, ids: &[&str]) {
    for id in ids {
        filter_cms::append(store, Card::new(id), None).unwrap();
    }
}

/// Stored `(id, order)` pairs for the card collection, sorted by order.
pub fn stored_orders<S: DocumentStore>(store: &S) -> Vec<(String, u32)> {
    let mut cards = store.list_collection::<Card>().unwrap();
    filter_cms::sort_by_order(&mut cards);
    cards.into_iter().map(|card| (card.id, card.order)).collect()
}

/// Delegates to an in-memory store, refusing whole batches while `rejecting` is set.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: InMemoryDocumentStore,
    rejecting: AtomicBool,
    rejected: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject_batches(&self, rejecting: bool) {
        self.rejecting.store(rejecting, Ordering::SeqCst);
    }

    pub fn rejected(&self) -> usize {
        self.rejected.load(Ordering::SeqCst)
    }
}

impl DocumentStore for FlakyStore {
    fn get_document<M: Document>(&self, id: &str) -> Result<Option<Versioned<M>>, DocumentError> {
        self.inner.get_document(id)
    }

    fn save_document<M: Document>(&self, doc: &M) -> Result<Versioned<M>, DocumentError> {
        self.inner.save_document(doc)
    }

    fn insert_document<M: Document>(&self, doc: &M) -> Result<Versioned<M>, DocumentError> {
        self.inner.insert_document(doc)
    }

    fn update_document<M: Document>(
        &self,
        doc: &M,
        expected_version: u64,
    ) -> Result<Versioned<M>, DocumentError> {
        self.inner.update_document(doc, expected_version)
    }

    fn delete_document<M: Document>(&self, id: &str) -> Result<bool, DocumentError> {
        self.inner.delete_document::<M>(id)
    }

    fn find_documents<M: Document>(
        &self,
        predicate: &dyn Fn(&M) -> bool,
    ) -> Result<Vec<Versioned<M>>, DocumentError> {
        self.inner.find_documents(predicate)
    }

    fn commit_batch(&self, batch: WriteBatch) -> Result<u64, DocumentError> {
        if self.rejecting.load(Ordering::SeqCst) {
            self.rejected.fetch_add(1, Ordering::SeqCst);
            return Err(DocumentError::Rejected("permission denied".into()));
        }
        self.inner.commit_batch(batch)
    }

    fn subscribe<M: Document>(&self) -> Result<Subscription<M>, DocumentError> {
        self.inner.subscribe()
    }
}
