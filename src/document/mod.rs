//! Documents - typed records stored in named collections.
//!
//! A `DocumentStore` is the document database the dashboard edits: CRUD on
//! typed documents, atomic multi-document batches, and live snapshot
//! listeners per collection.
//!
//! ## Example
//!
//! ```ignore
//! use filter_cms::{Document, DocumentsExt, InMemoryDocumentStore};
//!
//! #[derive(Serialize, Deserialize, Clone, Document)]
//! #[document(collection = "onboarding_sliders")]
//! struct OnboardingSlide {
//!     #[document(id)]
//!     pub id: String,
//!     #[document(order)]
//!     pub order: u32,
//! }
//!
//! let store = InMemoryDocumentStore::new();
//! store.documents::<OnboardingSlide>().save(&slide)?;
//! let loaded = store.documents::<OnboardingSlide>().get("slide-1")?;
//! ```

mod in_memory;
mod repository;
mod store;

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Trait for types stored as documents.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Collection this document type lives in (e.g. "categories", "onboarding_sliders").
    const COLLECTION: &'static str;

    /// Stable, externally assigned identifier.
    fn id(&self) -> &str;
}

/// A document together with its per-document version.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub data: T,
    pub version: u64,
}

/// Address of a document: collection plus id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentKey {
    pub collection: String,
    pub id: String,
}

impl DocumentKey {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }

    pub fn of<M: Document>(id: impl Into<String>) -> Self {
        Self::new(M::COLLECTION, id)
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.collection, self.id)
    }
}

/// Error type for document store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// Optimistic concurrency conflict.
    #[error("concurrency conflict on {collection}:{id} (expected version {expected}, actual {actual})")]
    ConcurrencyConflict {
        collection: String,
        id: String,
        expected: u64,
        actual: u64,
    },
    /// Serialization/deserialization error.
    #[error("document serialization error: {0}")]
    Serde(String),
    /// Storage-level error.
    #[error("document storage error: {0}")]
    Storage(String),
    /// Document not found.
    #[error("document not found: {collection}:{id}")]
    NotFound { collection: String, id: String },
    /// The store refused a batch as a whole.
    #[error("batch rejected: {0}")]
    Rejected(String),
}

impl From<serde_json::Error> for DocumentError {
    fn from(err: serde_json::Error) -> Self {
        DocumentError::Serde(err.to_string())
    }
}

pub use in_memory::InMemoryDocumentStore;
pub use repository::{DocumentRepository, DocumentsExt};
pub use store::DocumentStore;
