//! Record-store boundary for Strata.
//!
//! The marshaling engine produces and consumes [`PropertyBag`]s; this crate
//! defines where those bags live. A record is one bag keyed by the entity's
//! [`EntityRef`]. Identity and parent references are resolved by the caller
//! before marshaling — the store never inspects bag contents.
//!
//! # Design Rules
//!
//! 1. `put` replaces the whole bag. The engine's save output omits
//!    null/empty aggregates by design, so merging with previously stored
//!    properties would resurrect deleted values.
//! 2. Concurrent reads are always safe; the in-memory backend clones on
//!    read and write.
//! 3. All backend errors are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryRecordStore;
pub use traits::RecordStore;

// Re-exported so store callers name keys and bags without an extra import.
pub use strata_types::{EntityRef, PropertyBag};
