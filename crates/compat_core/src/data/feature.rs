//! Feature tree nodes.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use super::support::SupportTable;
use crate::error::{CompatError, Result};

/// Key under which a feature object stores its compat block.
pub const COMPAT_KEY: &str = "__compat";

/// Compat block of a feature (`__compat` in the source document).
///
/// Only the support table is modelled; descriptions, URLs and status flags
/// are outside what the presence rules look at and are skipped.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CompatBlock {
    /// Per-browser support statements.
    #[serde(default)]
    pub support: Option<SupportTable>,
}

impl CompatBlock {
    /// Create a compat block carrying a support table.
    #[must_use]
    pub fn with_support(support: SupportTable) -> Self {
        Self {
            support: Some(support),
        }
    }
}

/// One node of a compat data tree.
///
/// A node optionally carries a [`CompatBlock`] and owns its named child
/// features in document order.
///
/// # Example JSON
///
/// ```json
/// {
///     "api": {
///         "AbortController": {
///             "__compat": { "support": { "chrome": { "version_added": "66" } } },
///             "abort": { "__compat": { "support": { "chrome": {} } } }
///         }
///     }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureNode {
    compat: Option<CompatBlock>,
    children: Vec<(String, FeatureNode)>,
}

impl FeatureNode {
    /// Create an empty node with no compat block and no children.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a feature tree from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(CompatError::FeatureDecode)
    }

    /// Decode a feature tree from an already parsed JSON value.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(CompatError::FeatureDecode)
    }

    /// Attach a compat block.
    pub fn with_compat(mut self, compat: CompatBlock) -> Self {
        self.compat = Some(compat);
        self
    }

    /// Add (or replace) a named child.
    pub fn with_child(mut self, name: impl Into<String>, child: FeatureNode) -> Self {
        self.insert_child(name, child);
        self
    }

    /// Add a named child, replacing an existing child of the same name in place.
    pub fn insert_child(&mut self, name: impl Into<String>, child: FeatureNode) {
        let name = name.into();
        match self.children.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = child,
            None => self.children.push((name, child)),
        }
    }

    /// The compat block, if this node has one.
    #[must_use]
    pub fn compat(&self) -> Option<&CompatBlock> {
        self.compat.as_ref()
    }

    /// The support table of this node's compat block, if both exist.
    #[must_use]
    pub fn support(&self) -> Option<&SupportTable> {
        self.compat.as_ref().and_then(|c| c.support.as_ref())
    }

    /// Named children in document order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &FeatureNode)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Get a child by name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&FeatureNode> {
        self.children
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, node)| node)
    }

    /// Look up a descendant by dotted path. The empty path is this node.
    #[must_use]
    pub fn descendant(&self, path: &str) -> Option<&FeatureNode> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.')
            .try_fold(self, |node, segment| node.child(segment))
    }

    /// Total number of nodes in this subtree, including this one.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|(_, child)| child.node_count())
            .sum::<usize>()
    }
}

impl<'de> Deserialize<'de> for FeatureNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct FeatureVisitor;

        impl<'de> Visitor<'de> for FeatureVisitor {
            type Value = FeatureNode;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a feature object")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<FeatureNode, A::Error> {
                let mut node = FeatureNode::new();
                while let Some(key) = map.next_key::<String>()? {
                    if key == COMPAT_KEY {
                        // null is treated as no compat block
                        node.compat = map.next_value::<Option<CompatBlock>>()?;
                    } else {
                        let child = map.next_value()?;
                        node.insert_child(key, child);
                    }
                }
                Ok(node)
            }
        }

        deserializer.deserialize_map(FeatureVisitor)
    }
}
