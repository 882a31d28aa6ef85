//! DocumentRepository - one collection of a store, addressed by type.

use std::marker::PhantomData;

use crate::listener::{OrderedSubscribe, Subscription};
use crate::ordered::{self, sort_by_order, Ordered};

use super::{Document, DocumentError, DocumentStore, Versioned};

pub struct DocumentRepository<'a, S, M> {
    store: &'a S,
    _marker: PhantomData<fn() -> M>,
}

impl<'a, S: DocumentStore, M: Document> DocumentRepository<'a, S, M> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub fn get(&self, id: &str) -> Result<Option<Versioned<M>>, DocumentError> {
        self.store.get_document(id)
    }

    /// Like [`get`](Self::get), but a missing document is `NotFound`.
    pub fn require(&self, id: &str) -> Result<M, DocumentError> {
        self.get(id)?
            .map(|versioned| versioned.data)
            .ok_or_else(|| DocumentError::NotFound {
                collection: M::COLLECTION.to_string(),
                id: id.to_string(),
            })
    }

    pub fn exists(&self, id: &str) -> Result<bool, DocumentError> {
        Ok(self.get(id)?.is_some())
    }

    pub fn save(&self, doc: &M) -> Result<Versioned<M>, DocumentError> {
        self.store.save_document(doc)
    }

    pub fn insert(&self, doc: &M) -> Result<Versioned<M>, DocumentError> {
        self.store.insert_document(doc)
    }

    pub fn update(&self, doc: &M, expected_version: u64) -> Result<Versioned<M>, DocumentError> {
        self.store.update_document(doc, expected_version)
    }

    pub fn delete(&self, id: &str) -> Result<bool, DocumentError> {
        self.store.delete_document::<M>(id)
    }

    /// Matching documents, without their versions.
    pub fn find(&self, predicate: &dyn Fn(&M) -> bool) -> Result<Vec<M>, DocumentError> {
        Ok(self
            .store
            .find_documents(predicate)?
            .into_iter()
            .map(|versioned| versioned.data)
            .collect())
    }

    pub fn all(&self) -> Result<Vec<M>, DocumentError> {
        self.store.list_collection()
    }

    pub fn subscribe(&self) -> Result<Subscription<M>, DocumentError> {
        self.store.subscribe()
    }
}

impl<'a, S: DocumentStore, M: Document + Ordered> DocumentRepository<'a, S, M> {
    /// The whole collection in display order.
    pub fn ordered(&self) -> Result<Vec<M>, DocumentError> {
        let mut records = self.all()?;
        sort_by_order(&mut records);
        Ok(records)
    }

    /// Create `record` at the end of the list, or at `explicit`.
    pub fn append(&self, record: M, explicit: Option<u32>) -> Result<M, DocumentError> {
        ordered::append(self.store, record, explicit)
    }

    pub fn subscribe_ordered(&self) -> Result<Subscription<M>, DocumentError> {
        self.store.subscribe_ordered()
    }
}

/// `store.documents::<M>()` on any DocumentStore.
pub trait DocumentsExt: DocumentStore + Sized {
    fn documents<M: Document>(&self) -> DocumentRepository<'_, Self, M> {
        DocumentRepository::new(self)
    }
}

impl<S: DocumentStore> DocumentsExt for S {}
