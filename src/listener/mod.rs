//! Listeners - live snapshot feeds per collection.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────┐        ┌──────────────────────────┐
//! │ DocumentStore                │ notify │ ListenerRegistry         │
//! │  commit_batch / save / ...   │───────▶│  one slot per listener   │
//! └──────────────────────────────┘        └──────────────────────────┘
//!                                                     │ full snapshot
//!                                                     ▼
//!                                         ┌──────────────────────────┐
//!                                         │ Subscription<M>          │
//!                                         │  try_next / poll / next  │
//!                                         └──────────────────────────┘
//! ```
//!
//! Every notification carries the whole collection, never a delta. A reader
//! that falls behind can skip straight to the newest snapshot with
//! `drain_latest()`.

mod registry;
mod subscription;

pub use registry::{ListenerRegistry, RawSnapshot};
pub use subscription::{OrderedSubscribe, Snapshot, Subscription};
