//! Content store for an image-filter app's admin dashboard.
//!
//! The dashboard edits typed documents (categories, filters, onboarding
//! slides, prompt-builder taxonomies) in a realtime document store, and
//! keeps user-sortable lists consistent across optimistic drag-and-drop,
//! atomic batch writes and live listener snapshots.
//!
//! ## Quick start
//!
//! ```ignore
//! use filter_cms::{catalog::OnboardingSlide, append, DragEnd, InMemoryDocumentStore, ReorderSession};
//!
//! let store = InMemoryDocumentStore::new();
//! append(&store, OnboardingSlide::new("welcome", "Welcome"), None)?;
//! append(&store, OnboardingSlide::new("filters", "Pick a filter"), None)?;
//!
//! let mut session = ReorderSession::<_, filter_cms::FlatScope<OnboardingSlide>>::flat(&store)?;
//! let outcome = session.drag_end(&DragEnd::new("filters", "welcome"));
//! assert!(outcome.is_committed());
//! ```

extern crate self as filter_cms;

pub mod batch;
pub mod catalog;
pub mod config;
pub mod document;
pub mod listener;
pub mod metrics;
pub mod ordered;
pub mod reorder;
pub mod scope;
pub mod session;
pub mod view;

#[cfg(feature = "http")]
pub mod http;

pub use batch::{BatchWrite, WriteBatch, WriteBatchExt, WriteOp};
pub use config::{CmsConfig, ConfigError};
pub use document::{
    Document, DocumentError, DocumentKey, DocumentRepository, DocumentStore, DocumentsExt,
    InMemoryDocumentStore, Versioned,
};
pub use listener::{ListenerRegistry, OrderedSubscribe, RawSnapshot, Snapshot, Subscription};
pub use metrics::DashboardMetrics;
pub use ordered::{append, assign_order, is_contiguous, next_order, sort_by_order, Identified, Ordered};
pub use reorder::{DragEnd, OrderChange, ReorderPlan, Skip};
pub use scope::{FlatScope, NestedList, NestedScope, OrderedScope};
pub use session::{DragOutcome, ReorderSession};
pub use view::LocalOrderedView;

// Derive macro shares the trait's name, like serde's Serialize.
pub use filter_cms_macros::Document;
