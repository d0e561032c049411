//! Describable object model for Strata.
//!
//! Rust has no runtime reflection, so the shape a marshaler discovers is an
//! explicit, immutable description built once at startup: an [`EntityClass`]
//! lists its attributes ([`AttrSpec`]) and optionally extends a parent class.
//! Objects are dynamic [`Instance`]s of a class, holding one [`AttrValue`]
//! slot per declared attribute.
//!
//! # Key Types
//!
//! - [`EntityClass`] — immutable class description with a superclass chain
//! - [`AttrSpec`] / [`AttrShape`] / [`AttrRole`] — one attribute's declaration
//! - [`Instance`] — a dynamic object of a class
//! - [`AttrValue`] / [`SeqValue`] — slot values, including typed sequences

pub mod class;
pub mod error;
pub mod instance;
pub mod value;

pub use class::{AttrRole, AttrShape, AttrSpec, ClassBuilder, EntityClass};
pub use error::{ModelError, ModelResult};
pub use instance::Instance;
pub use value::{AttrValue, SeqValue};
