//! LocalOrderedView - the session's disposable mirror of an ordered scope.
//!
//! The view is replaced wholesale by every listener snapshot and may diverge
//! from the store only through `reorder_locally`, until the next snapshot
//! arrives. It never merges.

use std::fmt;

use crate::ordered::Identified;
use crate::reorder::move_in_place;

type RenderHook<T> = Box<dyn FnMut(&[T]) + Send>;

pub struct LocalOrderedView<T> {
    records: Vec<T>,
    revision: u64,
    /// Sequence of the snapshot currently shown; None before the first one.
    sequence: Option<u64>,
    optimistic: bool,
    on_render: Option<RenderHook<T>>,
}

impl<T> Default for LocalOrderedView<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            revision: 0,
            sequence: None,
            optimistic: false,
            on_render: None,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalOrderedView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalOrderedView")
            .field("records", &self.records)
            .field("revision", &self.revision)
            .field("sequence", &self.sequence)
            .field("optimistic", &self.optimistic)
            .finish()
    }
}

impl<T: Identified> LocalOrderedView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback run on every render.
    pub fn on_render<F>(&mut self, hook: F)
    where
        F: FnMut(&[T]) + Send + 'static,
    {
        self.on_render = Some(Box::new(hook));
    }

    /// Replace the whole view. `records` arrive sorted by the listener.
    pub fn on_snapshot(&mut self, sequence: u64, records: Vec<T>) {
        self.records = records;
        self.sequence = Some(sequence);
        self.optimistic = false;
        self.render();
    }

    /// Move the element at `from` to `to` in memory only.
    ///
    /// Returns false (and renders nothing) for equal or out-of-range indices.
    pub fn reorder_locally(&mut self, from: usize, to: usize) -> bool {
        if !move_in_place(&mut self.records, from, to) {
            return false;
        }
        self.optimistic = true;
        self.render();
        true
    }

    /// Show `records` as a local, not yet echoed state.
    pub fn apply_optimistic(&mut self, records: Vec<T>) {
        self.records = records;
        self.optimistic = true;
        self.render();
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn ids(&self) -> Vec<&str> {
        self.records.iter().map(Identified::record_id).collect()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|record| record.record_id() == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of renders so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn sequence(&self) -> Option<u64> {
        self.sequence
    }

    /// Whether the view shows a local reorder the store has not echoed yet.
    pub fn is_optimistic(&self) -> bool {
        self.optimistic
    }

    fn render(&mut self) {
        self.revision += 1;
        if let Some(hook) = self.on_render.as_mut() {
            hook(&self.records);
        }
    }
}
