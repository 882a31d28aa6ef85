//! Ordering primitives shared by flat collections and nested lists.
//!
//! `order` is a non-negative integer; ascending `order` is display order.
//! Gaps are allowed between reorders, and every reorder rewrites a scope to
//! the contiguous range `0..n`.

use crate::batch::WriteBatch;
use crate::document::{Document, DocumentError, DocumentStore};

/// Records that sit at a position in a user-sortable list.
pub trait Ordered {
    fn order(&self) -> u32;
    fn set_order(&mut self, order: u32);
}

/// Records addressable by a stable id inside their scope.
///
/// Every `Document` is identified by its document id; nested list items
/// implement this by hand.
pub trait Identified {
    fn record_id(&self) -> &str;
}

impl<D: Document> Identified for D {
    fn record_id(&self) -> &str {
        self.id()
    }
}

/// Position for a record appended to `records`: `max(order) + 1`, or 0 when empty.
pub fn next_order<'a, T, I>(records: I) -> u32
where
    T: Ordered + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records
        .into_iter()
        .map(Ordered::order)
        .max()
        .map_or(0, |max| max.saturating_add(1))
}

/// Apply the creation rule: an explicit order wins, otherwise append.
pub fn assign_order<T: Ordered>(record: &mut T, existing: &[T], explicit: Option<u32>) {
    let order = explicit.unwrap_or_else(|| next_order(existing));
    record.set_order(order);
}

/// Ascending by `order`, ties broken by id so equal orders stay deterministic.
pub fn sort_by_order<T: Identified + Ordered>(records: &mut [T]) {
    records.sort_by(|a, b| {
        a.order()
            .cmp(&b.order())
            .then_with(|| a.record_id().cmp(b.record_id()))
    });
}

/// Whether `records` carry exactly the orders `0..n` in sequence.
pub fn is_contiguous<T: Ordered>(records: &[T]) -> bool {
    records
        .iter()
        .enumerate()
        .all(|(index, record)| record.order() as usize == index)
}

/// Create a flat-scope record, placing it with the creation rule.
///
/// Returns the record as stored, with its assigned order. The collection is
/// read before the write, so concurrent creators can pick the same order.
pub fn append<S, M>(store: &S, mut record: M, explicit: Option<u32>) -> Result<M, DocumentError>
where
    S: DocumentStore,
    M: Document + Ordered,
{
    let existing = store.list_collection::<M>()?;
    assign_order(&mut record, &existing, explicit);

    WriteBatch::new().set(&record).commit(store)?;
    tracing::debug!(
        collection = M::COLLECTION,
        id = record.id(),
        order = record.order(),
        "appended ordered record"
    );

    Ok(record)
}
