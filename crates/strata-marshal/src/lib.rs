//! The Strata marshaling engine.
//!
//! Translates between a typed object graph ([`strata_model::Instance`]) and
//! the flat property form ([`strata_types::PropertyBag`]) used by a record
//! store. A class's shape is discovered once, producing an immutable
//! [`ClassMapping`] from full dotted path names to bound leaf converters;
//! `load` and `save` are then pure functions of (mapping, instance, bag).
//!
//! # Components
//!
//! - [`Navigator`] — locates (lazily creating on load) the sub-instance that
//!   owns a leaf attribute, at any nesting depth
//! - [`Loader`] — converts one flat property to/from one attribute's value;
//!   scalar, fixed-size sequence, and dynamic sequence variants
//! - [`ClassMapping`] — the discovered path → loader mapping for one class
//! - [`Registry`] — registration API caching one mapping per class
//!
//! # Rules the engine guarantees
//!
//! - Identity and parent-reference attributes never enter the mapping.
//! - Null and empty aggregates are never persisted; scalars persist null.
//! - Legacy path aliases are honored on load, never written on save.
//! - Unknown stored paths are silently skipped on load.
//! - Path collisions, missing no-argument construction, and repeated
//!   embedded objects fail at registration, never at load/save time.

pub mod error;
pub mod loader;
pub mod mapping;
pub mod navigator;
pub mod registry;
mod visitor;

pub use error::{MarshalError, MarshalResult};
pub use loader::{Loader, LoaderKind};
pub use mapping::ClassMapping;
pub use navigator::Navigator;
pub use registry::Registry;
