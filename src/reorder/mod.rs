//! Reorder engine - turns a drag-and-drop gesture into a contiguous order
//! assignment.
//!
//! The engine is pure: it never touches a store. `plan` resolves the drag's
//! ids to indices, moves the element, reindexes the whole sequence to
//! `0..n`, and reports which records changed position value.

use serde::{Deserialize, Serialize};

use crate::ordered::{Identified, Ordered};

/// End of a drag gesture, as reported by the list widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragEnd {
    /// The dragged record.
    pub active_id: String,
    /// The record under the drop point; None when released outside the list.
    #[serde(default)]
    pub over_id: Option<String>,
}

impl DragEnd {
    pub fn new(active_id: impl Into<String>, over_id: impl Into<String>) -> Self {
        Self {
            active_id: active_id.into(),
            over_id: Some(over_id.into()),
        }
    }

    /// A drag released outside any valid target.
    pub fn cancelled(active_id: impl Into<String>) -> Self {
        Self {
            active_id: active_id.into(),
            over_id: None,
        }
    }
}

/// Why a drag produced no reorder. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Skip {
    /// No drop target.
    Cancelled,
    /// Dropped onto itself.
    SameTarget,
    /// One of the ids is not in the current sequence.
    Unresolved,
}

/// One persisted position change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderChange {
    pub id: String,
    pub order: u32,
}

/// Result of planning a reorder.
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderPlan<T> {
    /// Full sequence in its new order, reindexed `0..n`.
    pub reordered: Vec<T>,
    /// Records whose `order` value differs from before.
    pub changes: Vec<OrderChange>,
}

impl<T> ReorderPlan<T> {
    /// Whether persisting this plan would change anything.
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Remove the element at `from` and reinsert it at `to`.
///
/// Returns None when `from == to` or either index is out of bounds.
pub fn move_index<T: Clone>(items: &[T], from: usize, to: usize) -> Option<Vec<T>> {
    if from == to || from >= items.len() || to >= items.len() {
        return None;
    }

    let mut moved = items.to_vec();
    let element = moved.remove(from);
    moved.insert(to, element);
    Some(moved)
}

/// In-place variant of [`move_index`]. Returns whether anything moved.
pub fn move_in_place<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }

    let element = items.remove(from);
    items.insert(to, element);
    true
}

/// Resolve the two ids of a drag to `(from, to)` indices.
pub fn resolve<T: Identified>(records: &[T], drag: &DragEnd) -> Result<(usize, usize), Skip> {
    let over_id = drag.over_id.as_deref().ok_or(Skip::Cancelled)?;
    if over_id == drag.active_id {
        return Err(Skip::SameTarget);
    }

    let from = index_of(records, &drag.active_id).ok_or(Skip::Unresolved)?;
    let to = index_of(records, over_id).ok_or(Skip::Unresolved)?;
    Ok((from, to))
}

/// Plan the reorder a drag asks for.
pub fn plan<T>(records: &[T], drag: &DragEnd) -> Result<ReorderPlan<T>, Skip>
where
    T: Identified + Ordered + Clone,
{
    let (from, to) = resolve(records, drag)?;
    let moved = move_index(records, from, to).ok_or(Skip::SameTarget)?;
    Ok(reindex(moved))
}

/// Assign `order = position` to every record, collecting the changes.
///
/// Applied to an already-ordered sequence this normalises gaps and
/// duplicates without moving anything.
pub fn reindex<T: Identified + Ordered>(mut records: Vec<T>) -> ReorderPlan<T> {
    let mut changes = Vec::new();

    for (position, record) in records.iter_mut().enumerate() {
        let order = position as u32;
        if record.order() != order {
            record.set_order(order);
            changes.push(OrderChange {
                id: record.record_id().to_string(),
                order,
            });
        }
    }

    ReorderPlan {
        reordered: records,
        changes,
    }
}

fn index_of<T: Identified>(records: &[T], id: &str) -> Option<usize> {
    records.iter().position(|record| record.record_id() == id)
}
