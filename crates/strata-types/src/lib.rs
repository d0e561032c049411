//! Foundation types for Strata.
//!
//! This crate provides the value-level vocabulary shared by the rest of the
//! workspace. Every other strata crate depends on `strata-types`.
//!
//! # Key Types
//!
//! - [`Scalar`] — one in-memory leaf value (null, bool, int, float, text, ref)
//! - [`ScalarType`] — the declared type tag a scalar is converted against
//! - [`EntityRef`] — structured reference to another entity, with parent chain
//! - [`RefCodec`] — boundary trait converting refs to/from raw store strings
//! - [`SeqKind`] — concrete-container tag for dynamic sequences
//! - [`Property`] / [`PropertyBag`] — the flat persisted form

pub mod error;
pub mod property;
pub mod refs;
pub mod scalar;

pub use error::TypeError;
pub use property::{Property, PropertyBag, SeqKind};
pub use refs::{EntityRef, PathRefCodec, RefCodec, RefId};
pub use scalar::{Scalar, ScalarType};
