//! InMemoryDocumentStore - BTreeMap-backed document store for tests, demos
//! and single-process dashboards.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;

use crate::batch::{WriteBatch, WriteOp};
use crate::listener::{ListenerRegistry, RawSnapshot, Subscription};

use super::{Document, DocumentError, DocumentKey, DocumentStore, Versioned};

/// Internal stored representation of a document.
#[derive(Clone)]
struct StoredDocument {
    bytes: Vec<u8>,
    version: u64,
}

#[derive(Default)]
struct State {
    documents: BTreeMap<DocumentKey, StoredDocument>,
    /// Bumped once per successful mutation (single write or whole batch).
    sequence: u64,
}

impl State {
    fn collection(&self, collection: &str) -> impl Iterator<Item = (&DocumentKey, &StoredDocument)> {
        let start = DocumentKey::new(collection, "");
        let wanted = collection.to_string();
        self.documents
            .range(start..)
            .take_while(move |(key, _)| key.collection == wanted)
    }

    fn snapshot(&self, collection: &str) -> RawSnapshot {
        RawSnapshot {
            sequence: self.sequence,
            documents: self
                .collection(collection)
                .map(|(_, stored)| stored.bytes.clone())
                .collect(),
        }
    }
}

/// In-memory document store.
///
/// Documents are kept JSON-encoded and sorted by `(collection, id)`.
/// Clone-friendly via Arc: clones share storage and listeners.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    state: Arc<RwLock<State>>,
    listeners: ListenerRegistry,
}

impl InMemoryDocumentStore {
    /// Create a new empty document store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence of the last successful commit (0 for an untouched store).
    pub fn sequence(&self) -> Result<u64, DocumentError> {
        Ok(self.read()?.sequence)
    }

    /// Number of live listeners on `M`'s collection.
    pub fn listener_count<M: Document>(&self) -> usize {
        self.listeners.listener_count(M::COLLECTION)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, DocumentError> {
        self.state
            .read()
            .map_err(|_| DocumentError::Storage("lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, DocumentError> {
        self.state
            .write()
            .map_err(|_| DocumentError::Storage("lock poisoned".into()))
    }

    /// Bump the sequence and fan a fresh snapshot out to each touched collection.
    ///
    /// Runs under the state write lock so listeners observe commits in order.
    fn publish<'a>(
        &self,
        state: &mut State,
        touched: impl IntoIterator<Item = &'a str>,
    ) -> Result<u64, DocumentError> {
        state.sequence += 1;
        for collection in touched {
            if self.listeners.has_listeners(collection) {
                let reached = self.listeners.notify(collection, state.snapshot(collection))?;
                tracing::trace!(collection, reached, sequence = state.sequence, "snapshot delivered");
            }
        }
        Ok(state.sequence)
    }

    fn store_one<M: Document>(
        &self,
        doc: &M,
        expected: Option<u64>,
    ) -> Result<Versioned<M>, DocumentError> {
        let key = DocumentKey::of::<M>(doc.id());
        let bytes = serde_json::to_vec(doc)?;

        let mut state = self.write()?;
        let current = state.documents.get(&key).map(|stored| stored.version);

        match (expected, current) {
            (Some(0), Some(actual)) => {
                return Err(DocumentError::ConcurrencyConflict {
                    collection: M::COLLECTION.to_string(),
                    id: doc.id().to_string(),
                    expected: 0,
                    actual,
                })
            }
            (Some(expected), None) if expected > 0 => {
                return Err(DocumentError::NotFound {
                    collection: M::COLLECTION.to_string(),
                    id: doc.id().to_string(),
                })
            }
            (Some(expected), Some(actual)) if expected != actual => {
                return Err(DocumentError::ConcurrencyConflict {
                    collection: M::COLLECTION.to_string(),
                    id: doc.id().to_string(),
                    expected,
                    actual,
                })
            }
            _ => {}
        }

        let version = current.map_or(1, |version| version + 1);
        state
            .documents
            .insert(key, StoredDocument { bytes, version });
        self.publish(&mut state, [M::COLLECTION])?;

        Ok(Versioned {
            data: doc.clone(),
            version,
        })
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn get_document<M: Document>(&self, id: &str) -> Result<Option<Versioned<M>>, DocumentError> {
        let key = DocumentKey::of::<M>(id);
        let state = self.read()?;

        match state.documents.get(&key) {
            Some(stored) => {
                let data: M = serde_json::from_slice(&stored.bytes)?;
                Ok(Some(Versioned {
                    data,
                    version: stored.version,
                }))
            }
            None => Ok(None),
        }
    }

    fn save_document<M: Document>(&self, doc: &M) -> Result<Versioned<M>, DocumentError> {
        self.store_one(doc, None)
    }

    fn insert_document<M: Document>(&self, doc: &M) -> Result<Versioned<M>, DocumentError> {
        self.store_one(doc, Some(0))
    }

    fn update_document<M: Document>(
        &self,
        doc: &M,
        expected_version: u64,
    ) -> Result<Versioned<M>, DocumentError> {
        if expected_version == 0 {
            return Err(DocumentError::NotFound {
                collection: M::COLLECTION.to_string(),
                id: doc.id().to_string(),
            });
        }
        self.store_one(doc, Some(expected_version))
    }

    fn delete_document<M: Document>(&self, id: &str) -> Result<bool, DocumentError> {
        let key = DocumentKey::of::<M>(id);
        let mut state = self.write()?;

        if state.documents.remove(&key).is_none() {
            return Ok(false);
        }
        self.publish(&mut state, [M::COLLECTION])?;
        Ok(true)
    }

    fn find_documents<M: Document>(
        &self,
        predicate: &dyn Fn(&M) -> bool,
    ) -> Result<Vec<Versioned<M>>, DocumentError> {
        let state = self.read()?;
        let mut results = Vec::new();

        for (_, stored) in state.collection(M::COLLECTION) {
            let data: M = serde_json::from_slice(&stored.bytes)?;
            if predicate(&data) {
                results.push(Versioned {
                    data,
                    version: stored.version,
                });
            }
        }

        Ok(results)
    }

    fn commit_batch(&self, batch: WriteBatch) -> Result<u64, DocumentError> {
        let writes = batch.into_writes()?;
        let mut state = self.write()?;

        if writes.is_empty() {
            return Ok(state.sequence);
        }

        // Stage every write against the current state; nothing is applied
        // until all of them validate.
        let mut staged: BTreeMap<DocumentKey, Option<StoredDocument>> = BTreeMap::new();
        for write in writes {
            let previous = match staged.get(&write.key) {
                Some(entry) => entry.clone(),
                None => state.documents.get(&write.key).cloned(),
            };
            let next_version = previous.as_ref().map_or(1, |stored| stored.version + 1);

            let next = match write.op {
                WriteOp::Set(bytes) => Some(StoredDocument {
                    bytes,
                    version: next_version,
                }),
                WriteOp::Patch(fields) => {
                    let previous = previous.ok_or_else(|| DocumentError::NotFound {
                        collection: write.key.collection.clone(),
                        id: write.key.id.clone(),
                    })?;
                    let mut value: Value = serde_json::from_slice(&previous.bytes)?;
                    let object = value.as_object_mut().ok_or_else(|| {
                        DocumentError::Serde(format!("{} is not a JSON object", write.key))
                    })?;
                    object.extend(fields);
                    Some(StoredDocument {
                        bytes: serde_json::to_vec(&value)?,
                        version: next_version,
                    })
                }
                WriteOp::Delete => None,
            };

            staged.insert(write.key, next);
        }

        let touched: BTreeSet<String> = staged.keys().map(|key| key.collection.clone()).collect();
        for (key, next) in staged {
            match next {
                Some(stored) => {
                    state.documents.insert(key, stored);
                }
                None => {
                    state.documents.remove(&key);
                }
            }
        }

        let sequence = self.publish(&mut state, touched.iter().map(String::as_str))?;
        tracing::debug!(sequence, collections = touched.len(), "batch committed");
        Ok(sequence)
    }

    fn subscribe<M: Document>(&self) -> Result<Subscription<M>, DocumentError> {
        // Hold the read lock while registering so no commit can slip between
        // the initial snapshot and the first notification.
        let state = self.read()?;
        let receiver = self
            .listeners
            .register(M::COLLECTION, state.snapshot(M::COLLECTION))?;
        Ok(Subscription::new(receiver))
    }
}
