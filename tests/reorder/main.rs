//! Reorder integration tests: drag gestures through sessions, batches and
//! listener snapshots against an in-memory store.

mod support;

mod nested;
mod properties;
