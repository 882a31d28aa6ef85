//! WriteBatch - chain document writes into one all-or-nothing commit.
//!
//! ## Example
//!
//! ```ignore
//! WriteBatch::new()
//!     .set_order::<OnboardingSlide>("slide-b", 0)
//!     .set_order::<OnboardingSlide>("slide-c", 1)
//!     .set_order::<OnboardingSlide>("slide-a", 2)
//!     .commit(&store)?;
//! ```
//!
//! Serialization failures while building are remembered and returned from
//! `commit`, so nothing reaches the store from a half-built batch.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::document::{Document, DocumentError, DocumentKey, DocumentStore};

/// A single queued write (type-erased).
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Replace the whole document with these JSON bytes.
    Set(Vec<u8>),
    /// Merge top-level fields into an existing document.
    Patch(Map<String, Value>),
    /// Remove the document if present.
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchWrite {
    pub key: DocumentKey,
    pub op: WriteOp,
}

/// Builder for an atomic multi-document write.
#[derive(Debug, Default)]
pub struct WriteBatch {
    writes: Vec<BatchWrite>,
    error: Option<DocumentError>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a full replacement of `doc`.
    pub fn set<M: Document>(mut self, doc: &M) -> Self {
        match serde_json::to_vec(doc) {
            Ok(bytes) => self.writes.push(BatchWrite {
                key: DocumentKey::of::<M>(doc.id()),
                op: WriteOp::Set(bytes),
            }),
            Err(err) => self.remember(err.into()),
        }
        self
    }

    /// Queue a single-field merge into an existing document.
    pub fn patch<M: Document, V: Serialize>(mut self, id: &str, field: &str, value: V) -> Self {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(err) => {
                self.remember(err.into());
                return self;
            }
        };

        let key = DocumentKey::of::<M>(id);
        if let Some(BatchWrite {
            op: WriteOp::Patch(fields),
            ..
        }) = self.writes.iter_mut().find(|write| write.key == key)
        {
            fields.insert(field.to_string(), value);
            return self;
        }

        let mut fields = Map::new();
        fields.insert(field.to_string(), value);
        self.writes.push(BatchWrite {
            key,
            op: WriteOp::Patch(fields),
        });
        self
    }

    /// Queue an `order` field update.
    pub fn set_order<M: Document>(self, id: &str, order: u32) -> Self {
        self.patch::<M, _>(id, "order", order)
    }

    /// Queue a deletion.
    pub fn delete<M: Document>(mut self, id: &str) -> Self {
        self.writes.push(BatchWrite {
            key: DocumentKey::of::<M>(id),
            op: WriteOp::Delete,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn writes(&self) -> &[BatchWrite] {
        &self.writes
    }

    /// Split into the queued writes, or the first build error.
    pub fn into_writes(self) -> Result<Vec<BatchWrite>, DocumentError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.writes),
        }
    }

    /// Commit every queued write atomically. Returns the commit sequence.
    pub fn commit<S: DocumentStore>(self, store: &S) -> Result<u64, DocumentError> {
        store.commit_batch(self)
    }

    fn remember(&mut self, err: DocumentError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

/// Start a batch from any store.
pub trait WriteBatchExt: DocumentStore + Sized {
    fn batch(&self) -> WriteBatch {
        WriteBatch::new()
    }
}

impl<S: DocumentStore> WriteBatchExt for S {}
