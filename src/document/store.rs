//! DocumentStore - abstract document database.

use crate::batch::WriteBatch;
use crate::listener::Subscription;

use super::{Document, DocumentError, Versioned};

/// Abstract document database: typed CRUD, atomic batches and live listeners.
///
/// Single-document writes notify listeners the same way a one-write batch does.
pub trait DocumentStore: Send + Sync {
    /// Get a document by ID. Returns None if not found.
    fn get_document<M: Document>(&self, id: &str) -> Result<Option<Versioned<M>>, DocumentError>;

    /// Upsert a document (insert or replace, no version check).
    fn save_document<M: Document>(&self, doc: &M) -> Result<Versioned<M>, DocumentError>;

    /// Insert a new document. Fails if it already exists.
    fn insert_document<M: Document>(&self, doc: &M) -> Result<Versioned<M>, DocumentError>;

    /// Replace an existing document with optimistic concurrency control.
    fn update_document<M: Document>(
        &self,
        doc: &M,
        expected_version: u64,
    ) -> Result<Versioned<M>, DocumentError>;

    /// Delete a document by ID. Returns true if it existed.
    fn delete_document<M: Document>(&self, id: &str) -> Result<bool, DocumentError>;

    /// Find documents matching a predicate.
    fn find_documents<M: Document>(
        &self,
        predicate: &dyn Fn(&M) -> bool,
    ) -> Result<Vec<Versioned<M>>, DocumentError>;

    /// All documents of a collection, in unspecified order.
    fn list_collection<M: Document>(&self) -> Result<Vec<M>, DocumentError> {
        Ok(self
            .find_documents::<M>(&|_| true)?
            .into_iter()
            .map(|versioned| versioned.data)
            .collect())
    }

    /// Apply every write in the batch, or none of them.
    ///
    /// Returns the commit sequence assigned to the batch.
    fn commit_batch(&self, batch: WriteBatch) -> Result<u64, DocumentError>;

    /// Subscribe to full snapshots of a collection.
    ///
    /// The current state is delivered as the first snapshot.
    fn subscribe<M: Document>(&self) -> Result<Subscription<M>, DocumentError>;
}
