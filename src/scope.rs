//! Ordered scopes - where a sortable list lives and how a reorder of it is
//! written back.
//!
//! Two shapes share one engine:
//!
//! - [`FlatScope`]: every record is its own document; a reorder becomes one
//!   `order` patch per changed record, all in a single batch.
//! - [`NestedScope`]: the list is an array field inside a parent document;
//!   a reorder rewrites that array wholesale in a single-write batch.

use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};

use crate::batch::WriteBatch;
use crate::document::{Document, DocumentError, DocumentStore};
use crate::listener::{OrderedSubscribe, Snapshot, Subscription};
use crate::ordered::{sort_by_order, Identified, Ordered};
use crate::reorder::ReorderPlan;

/// A document that embeds an ordered list.
pub trait NestedList: Document {
    type Item: Identified + Ordered + Clone + Serialize + DeserializeOwned + Send + Sync;

    /// Name of the array field holding the items.
    const FIELD: &'static str;

    fn items(&self) -> &[Self::Item];
    fn items_mut(&mut self) -> &mut Vec<Self::Item>;
}

/// A user-sortable list and the way its reorders are persisted.
pub trait OrderedScope {
    /// Document type the listener watches.
    type Source: Document;
    /// Records the view shows and the engine moves.
    type Record: Identified + Ordered + Clone;

    fn subscribe<S: DocumentStore>(
        &self,
        store: &S,
    ) -> Result<Subscription<Self::Source>, DocumentError>;

    /// The ordered records contained in a snapshot of the source collection.
    fn records(&self, snapshot: Snapshot<Self::Source>) -> Vec<Self::Record>;

    /// Write a plan back atomically. Returns the commit sequence.
    fn persist<S: DocumentStore>(
        &self,
        store: &S,
        plan: &ReorderPlan<Self::Record>,
    ) -> Result<u64, DocumentError>;

    /// Human-readable scope name for logs.
    fn label(&self) -> String;
}

/// A top-level collection of ordered documents.
pub struct FlatScope<M> {
    _marker: PhantomData<fn() -> M>,
}

impl<M> FlatScope<M> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<M> Default for FlatScope<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Document + Ordered> OrderedScope for FlatScope<M> {
    type Source = M;
    type Record = M;

    fn subscribe<S: DocumentStore>(&self, store: &S) -> Result<Subscription<M>, DocumentError> {
        store.subscribe_ordered::<M>()
    }

    fn records(&self, snapshot: Snapshot<M>) -> Vec<M> {
        snapshot.records
    }

    fn persist<S: DocumentStore>(
        &self,
        store: &S,
        plan: &ReorderPlan<M>,
    ) -> Result<u64, DocumentError> {
        plan.changes
            .iter()
            .fold(WriteBatch::new(), |batch, change| {
                batch.set_order::<M>(&change.id, change.order)
            })
            .commit(store)
    }

    fn label(&self) -> String {
        M::COLLECTION.to_string()
    }
}

/// The ordered list embedded in one parent document.
pub struct NestedScope<P> {
    parent_id: String,
    _marker: PhantomData<fn() -> P>,
}

impl<P> NestedScope<P> {
    pub fn new(parent_id: impl Into<String>) -> Self {
        Self {
            parent_id: parent_id.into(),
            _marker: PhantomData,
        }
    }

    pub fn parent_id(&self) -> &str {
        &self.parent_id
    }
}

impl<P: NestedList> OrderedScope for NestedScope<P> {
    type Source = P;
    type Record = P::Item;

    fn subscribe<S: DocumentStore>(&self, store: &S) -> Result<Subscription<P>, DocumentError> {
        store.subscribe::<P>()
    }

    /// Items of the parent, sorted; empty when the parent is gone.
    fn records(&self, snapshot: Snapshot<P>) -> Vec<P::Item> {
        let mut items = snapshot
            .records
            .into_iter()
            .find(|parent| parent.id() == self.parent_id)
            .map(|parent| parent.items().to_vec())
            .unwrap_or_default();
        sort_by_order(&mut items);
        items
    }

    fn persist<S: DocumentStore>(
        &self,
        store: &S,
        plan: &ReorderPlan<P::Item>,
    ) -> Result<u64, DocumentError> {
        WriteBatch::new()
            .patch::<P, _>(&self.parent_id, P::FIELD, &plan.reordered)
            .commit(store)
    }

    fn label(&self) -> String {
        format!("{}:{}.{}", P::COLLECTION, self.parent_id, P::FIELD)
    }
}
