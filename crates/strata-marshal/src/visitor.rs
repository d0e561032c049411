//! One-time recursive schema discovery.
//!
//! Walks a class chain and its embedded classes, binding one [`Loader`] per
//! leaf attribute under its full dotted path name. Parents are visited
//! before the declaring class, and attributes in declaration order, so
//! collision errors name the later registration. All configuration errors
//! (path collisions, missing no-argument construction, repeated embedded
//! shapes) surface here, eagerly.

use std::sync::Arc;

use strata_model::{AttrRole, AttrShape, AttrSpec, EntityClass};

use crate::error::{MarshalError, MarshalResult};
use crate::loader::{Loader, LoaderKind};
use crate::mapping::MappingBuilder;
use crate::navigator::Navigator;

/// Discovery state for one nesting level.
pub(crate) struct Visitor {
    prefix: String,
    force_unindexed: bool,
    navigator: Navigator,
}

impl Visitor {
    /// Visitor for the top-level class.
    pub(crate) fn root() -> Self {
        Self {
            prefix: String::new(),
            force_unindexed: false,
            navigator: Navigator::root(),
        }
    }

    /// Visitor for an embedded level reached through `navigator`.
    fn nested(navigator: Navigator, prefix: String, force_unindexed: bool) -> Self {
        Self {
            prefix,
            force_unindexed,
            navigator,
        }
    }

    /// Full path name for an attribute (or alias) at this level.
    fn extend(&self, segment: &str) -> String {
        if self.prefix.is_empty() {
            segment.to_string()
        } else {
            format!("{}.{}", self.prefix, segment)
        }
    }

    /// Visit a class chain: parents first, then declared attributes in
    /// declaration order.
    pub(crate) fn visit_class(
        &self,
        class: &Arc<EntityClass>,
        builder: &mut MappingBuilder,
    ) -> MarshalResult<()> {
        if let Some(parent) = class.parent() {
            self.visit_class(parent, builder)?;
        }
        for attr in class.declared_attrs() {
            self.visit_attr(class, attr, builder)?;
        }
        Ok(())
    }

    fn visit_attr(
        &self,
        class: &Arc<EntityClass>,
        attr: &AttrSpec,
        builder: &mut MappingBuilder,
    ) -> MarshalResult<()> {
        // Identity and parent-reference attributes are resolved by the
        // caller before the engine runs; transients never persist.
        if attr.role() != AttrRole::Persistent {
            return Ok(());
        }

        let unindexed = self.force_unindexed || attr.is_unindexed();

        match attr.shape() {
            AttrShape::EmbeddedArray(target) => {
                // Constructibility is checked even for shapes rejected
                // below, so a misdeclared target class surfaces first.
                if !target.is_constructible() {
                    return Err(MarshalError::MissingConstructor {
                        class: target.name().to_string(),
                    });
                }
                Err(MarshalError::RepeatedEmbedded {
                    class: class.name().to_string(),
                    attribute: attr.name().to_string(),
                })
            }
            AttrShape::EmbeddedSeq(_) => Err(MarshalError::RepeatedEmbedded {
                class: class.name().to_string(),
                attribute: attr.name().to_string(),
            }),
            AttrShape::Embedded(target) => {
                if !target.is_constructible() {
                    return Err(MarshalError::MissingConstructor {
                        class: target.name().to_string(),
                    });
                }
                let navigator = Navigator::embedded(
                    self.navigator.clone(),
                    attr.name(),
                    Arc::clone(target),
                );
                let nested =
                    Visitor::nested(navigator, self.extend(attr.name()), unindexed);
                nested.visit_class(target, builder)
            }
            AttrShape::Scalar(ty) => {
                self.register_leaf(attr, LoaderKind::Scalar { ty: *ty }, unindexed, builder)
            }
            AttrShape::Array(elem) => {
                self.register_leaf(attr, LoaderKind::Array { elem: *elem }, unindexed, builder)
            }
            AttrShape::Seq { elem, declared } => self.register_leaf(
                attr,
                LoaderKind::Seq {
                    elem: *elem,
                    declared: *declared,
                },
                unindexed,
                builder,
            ),
        }
    }

    fn register_leaf(
        &self,
        attr: &AttrSpec,
        kind: LoaderKind,
        unindexed: bool,
        builder: &mut MappingBuilder,
    ) -> MarshalResult<()> {
        let loader = Arc::new(Loader::new(
            self.navigator.clone(),
            attr.name(),
            !unindexed,
            kind,
        ));
        builder.register_primary(self.extend(attr.name()), Arc::clone(&loader))?;
        for alias in attr.aliases() {
            builder.register_alias(self.extend(alias), Arc::clone(&loader))?;
        }
        Ok(())
    }
}
