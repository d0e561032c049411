//! The flat persisted form: properties and the property bag.
//!
//! A property bag is an ordered-irrelevant mapping from full dotted path
//! name to one stored value. A sequence attribute maps to ONE array-valued
//! property, never N individually indexed properties; dynamic sequences
//! additionally carry a [`SeqKind`] tag so an abstract-declared attribute
//! can round-trip as the concrete container it was saved from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Concrete-container tag for a dynamic sequence attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeqKind {
    /// Ordered, duplicates allowed, random access.
    List,
    /// Ordered, duplicates allowed, efficient at both ends.
    Deque,
    /// Insertion-ordered, deduplicated.
    Set,
    /// Sorted, deduplicated.
    SortedSet,
}

/// One stored property: a value plus its store-level metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// The stored value: a scalar or an array of scalars.
    pub value: Value,
    /// Whether the store should build a secondary index on this value.
    pub indexed: bool,
    /// Concrete-container tag, present only for dynamic sequence values.
    pub seq_kind: Option<SeqKind>,
}

impl Property {
    /// An indexed property with no container tag.
    pub fn new(value: Value) -> Self {
        Self {
            value,
            indexed: true,
            seq_kind: None,
        }
    }

    /// Set the indexing flag.
    pub fn indexed(mut self, indexed: bool) -> Self {
        self.indexed = indexed;
        self
    }

    /// Attach a concrete-container tag.
    pub fn with_seq_kind(mut self, kind: SeqKind) -> Self {
        self.seq_kind = Some(kind);
        self
    }
}

/// The flat key/value form of one persisted entity.
///
/// Keys are full dotted path names. Iteration order is the path's sort
/// order, which keeps save output deterministic; consumers must not rely on
/// any particular order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyBag {
    entries: BTreeMap<String, Property>,
}

impl PropertyBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of properties in the bag.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the bag holds no properties.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a property under a full path name, replacing any previous one.
    pub fn insert(&mut self, path: impl Into<String>, property: Property) {
        self.entries.insert(path.into(), property);
    }

    /// Look up a property by full path name.
    pub fn get(&self, path: &str) -> Option<&Property> {
        self.entries.get(path)
    }

    /// Returns `true` if a property exists under the path.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Remove a property, returning it if present.
    pub fn remove(&mut self, path: &str) -> Option<Property> {
        self.entries.remove(path)
    }

    /// Iterate over `(path, property)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// All path names currently in the bag.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl FromIterator<(String, Property)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (String, Property)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_and_lookup() {
        let mut bag = PropertyBag::new();
        bag.insert("name", Property::new(json!("alice")));
        bag.insert("home.city", Property::new(json!("Oslo")).indexed(false));

        assert_eq!(bag.len(), 2);
        assert_eq!(bag.get("name").unwrap().value, json!("alice"));
        assert!(!bag.get("home.city").unwrap().indexed);
        assert!(bag.get("missing").is_none());
    }

    #[test]
    fn insert_replaces_previous_value() {
        let mut bag = PropertyBag::new();
        bag.insert("n", Property::new(json!(1)));
        bag.insert("n", Property::new(json!(2)));
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.get("n").unwrap().value, json!(2));
    }

    #[test]
    fn seq_kind_tag_survives_serialization() {
        let mut bag = PropertyBag::new();
        bag.insert(
            "tags",
            Property::new(json!(["a", "b"])).with_seq_kind(SeqKind::SortedSet),
        );
        let text = serde_json::to_string(&bag).unwrap();
        let back: PropertyBag = serde_json::from_str(&text).unwrap();
        assert_eq!(back.get("tags").unwrap().seq_kind, Some(SeqKind::SortedSet));
    }

    #[test]
    fn iteration_is_path_sorted() {
        let mut bag = PropertyBag::new();
        bag.insert("b", Property::new(json!(2)));
        bag.insert("a", Property::new(json!(1)));
        let paths: Vec<&str> = bag.paths().collect();
        assert_eq!(paths, vec!["a", "b"]);
    }
}
