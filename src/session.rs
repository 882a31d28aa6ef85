//! ReorderSession - one UI session over one ordered scope.
//!
//! A drag is handled in two decoupled steps: the local view moves the
//! element immediately, then the plan is committed as one atomic batch.
//! Nothing is rolled back on failure; the next listener snapshot replaces
//! the view with whatever the store actually holds.

use serde::Serialize;

use crate::document::{Document, DocumentError, DocumentStore};
use crate::ordered::Ordered;
use crate::reorder::{self, DragEnd, OrderChange, Skip};
use crate::scope::{FlatScope, NestedList, NestedScope, OrderedScope};
use crate::view::LocalOrderedView;
use crate::listener::Subscription;

/// What a drag-end did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DragOutcome {
    /// Guard failure: nothing moved, nothing persisted.
    Skipped { reason: Skip },
    /// The move left every order value as it was; nothing persisted.
    Unchanged,
    /// The batch committed.
    Committed {
        sequence: u64,
        changes: Vec<OrderChange>,
    },
    /// The batch was rejected; the view keeps the optimistic order.
    Failed {
        error: String,
        changes: Vec<OrderChange>,
    },
}

impl DragOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, DragOutcome::Committed { .. })
    }
}

pub struct ReorderSession<'s, S, Sc: OrderedScope> {
    store: &'s S,
    scope: Sc,
    subscription: Subscription<Sc::Source>,
    view: LocalOrderedView<Sc::Record>,
}

impl<'s, S, M> ReorderSession<'s, S, FlatScope<M>>
where
    S: DocumentStore,
    M: Document + Ordered,
{
    /// Session over a top-level collection.
    pub fn flat(store: &'s S) -> Result<Self, DocumentError> {
        Self::open(store, FlatScope::new())
    }
}

impl<'s, S, P> ReorderSession<'s, S, NestedScope<P>>
where
    S: DocumentStore,
    P: NestedList,
{
    /// Session over the list embedded in `parent_id`.
    pub fn nested(store: &'s S, parent_id: impl Into<String>) -> Result<Self, DocumentError> {
        Self::open(store, NestedScope::new(parent_id))
    }
}

impl<'s, S, Sc> ReorderSession<'s, S, Sc>
where
    S: DocumentStore,
    Sc: OrderedScope,
{
    /// Subscribe to the scope and show its current state.
    pub fn open(store: &'s S, scope: Sc) -> Result<Self, DocumentError> {
        let subscription = scope.subscribe(store)?;
        let mut session = Self {
            store,
            scope,
            subscription,
            view: LocalOrderedView::new(),
        };
        session.pump()?;
        Ok(session)
    }

    /// Apply the newest pending snapshot, if any. Last snapshot wins.
    pub fn pump(&mut self) -> Result<bool, DocumentError> {
        match self.subscription.drain_latest()? {
            Some(snapshot) => {
                let sequence = snapshot.sequence;
                let records = self.scope.records(snapshot);
                self.view.on_snapshot(sequence, records);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Wait up to `timeout_ms` for a snapshot, then apply the newest one.
    pub fn wait(&mut self, timeout_ms: u64) -> Result<bool, DocumentError> {
        match self.subscription.poll(timeout_ms)? {
            Some(snapshot) => {
                let sequence = snapshot.sequence;
                let records = self.scope.records(snapshot);
                self.view.on_snapshot(sequence, records);
                self.pump()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Handle the end of a drag gesture.
    pub fn drag_end(&mut self, drag: &DragEnd) -> DragOutcome {
        let (from, to) = match reorder::resolve(self.view.records(), drag) {
            Ok(indices) => indices,
            Err(reason) => {
                tracing::debug!(scope = %self.scope.label(), ?reason, "drag skipped");
                return DragOutcome::Skipped { reason };
            }
        };

        let Some(moved) = reorder::move_index(self.view.records(), from, to) else {
            return DragOutcome::Skipped {
                reason: Skip::SameTarget,
            };
        };
        // The view carries the reindexed orders until the echo arrives.
        let plan = reorder::reindex(moved);
        self.view.apply_optimistic(plan.reordered.clone());

        if plan.is_noop() {
            return DragOutcome::Unchanged;
        }

        match self.scope.persist(self.store, &plan) {
            Ok(sequence) => {
                tracing::debug!(
                    scope = %self.scope.label(),
                    sequence,
                    changed = plan.changes.len(),
                    "reorder committed"
                );
                DragOutcome::Committed {
                    sequence,
                    changes: plan.changes,
                }
            }
            Err(err) => {
                tracing::warn!(
                    scope = %self.scope.label(),
                    error = %err,
                    "reorder not persisted; waiting for next snapshot"
                );
                DragOutcome::Failed {
                    error: err.to_string(),
                    changes: plan.changes,
                }
            }
        }
    }

    pub fn view(&self) -> &LocalOrderedView<Sc::Record> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut LocalOrderedView<Sc::Record> {
        &mut self.view
    }

    pub fn scope(&self) -> &Sc {
        &self.scope
    }

    /// Tear the session down, unsubscribing from the store.
    pub fn close(self) {
        self.subscription.unsubscribe();
    }
}
