//! Mirrored error tree: one node per addressed location of the input.
//!
//! Serialized layout per node: `fields` (object children), `elements`
//! (array children keyed by stringified index, `"-1"` marking a missing
//! element) and `errors` (message list). Empty collections are omitted.

use crate::path::{Path, Step};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Element-tree key marking a location inside an array that does not
/// exist in the input.
pub const MISSING_ELEMENT: i64 = -1;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Errors {
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, Errors>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub elements: BTreeMap<i64, Errors>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no message exists anywhere in the tree.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
            && self.fields.values().all(Errors::is_empty)
            && self.elements.values().all(Errors::is_empty)
    }

    /// Append a message at the leaf addressed by `path`, creating the
    /// object/array skeleton on the way down. Array steps without a
    /// concrete index land in the missing-element slot.
    pub fn add(&mut self, path: &Path, message: impl Into<String>) {
        self.node_at(path).errors.push(message.into());
    }

    /// Merge a subtree at `path`. Existing nodes are merged recursively,
    /// message lists are appended in order.
    pub fn merge(&mut self, path: &Path, other: Errors) {
        self.node_at(path).merge_into(other);
    }

    fn merge_into(&mut self, other: Errors) {
        self.errors.extend(other.errors);
        for (name, subtree) in other.fields {
            self.fields.entry(name).or_default().merge_into(subtree);
        }
        for (index, subtree) in other.elements {
            self.elements.entry(index).or_default().merge_into(subtree);
        }
    }

    fn node_at(&mut self, path: &Path) -> &mut Errors {
        let mut node = self;
        for step in path.steps() {
            node = match step {
                Step::Object { name } => node.fields.entry(name.clone()).or_default(),
                Step::Array { index } => {
                    let key = index.map_or(MISSING_ELEMENT, |i| i as i64);
                    node.elements.entry(key).or_default()
                }
                Step::Element => node,
            };
        }
        node
    }
}
