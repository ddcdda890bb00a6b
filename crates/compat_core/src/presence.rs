//! Browser-presence validation of feature trees.
//!
//! Walks a [`FeatureNode`] tree depth-first and, at every node that has a
//! support table, runs three independent rules:
//!
//! 1. every browser in the table is defined in the registry,
//! 2. every browser in the table is displayable for the file's category,
//! 3. every browser the category requires is in the table.
//!
//! A browser missing from the registry is never displayable either, so it
//! is reported by both of the first two rules.

use crate::browsers::BrowserRegistry;
use crate::category::{classify, BrowserSetPair, Category};
use crate::data::{FeatureNode, SupportTable};
use crate::issue::{Issue, IssueKind, IssueSink};

/// Presence rules bound to one registry and one category.
///
/// The browser sets are computed once on construction and reused for every
/// node and every tree checked with this value.
#[derive(Debug, Clone)]
pub struct PresenceChecker<'a> {
    registry: &'a BrowserRegistry,
    category: Category,
    sets: BrowserSetPair,
}

impl<'a> PresenceChecker<'a> {
    /// Classify the registry for `category`.
    #[must_use]
    pub fn new(registry: &'a BrowserRegistry, category: Category) -> Self {
        let sets = classify(&category, registry);
        Self {
            registry,
            category,
            sets,
        }
    }

    /// Category the rules are evaluated for.
    #[must_use]
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Browser sets computed for the category.
    #[must_use]
    pub fn sets(&self) -> &BrowserSetPair {
        &self.sets
    }

    /// Check a whole tree, starting at the root path.
    pub fn check<S: IssueSink + ?Sized>(&self, root: &FeatureNode, sink: &mut S) {
        self.visit(root, "", sink);
    }

    fn visit<S: IssueSink + ?Sized>(&self, node: &FeatureNode, path: &str, sink: &mut S) {
        if let Some(support) = node.support() {
            self.check_support(support, path, sink);
        }

        for (name, child) in node.children() {
            let child_path = if path.is_empty() {
                name.to_string()
            } else {
                format!("{path}.{name}")
            };
            self.visit(child, &child_path, sink);
        }
    }

    fn check_support<S: IssueSink + ?Sized>(&self, support: &SupportTable, path: &str, sink: &mut S) {
        let unknown: Vec<String> = support
            .browsers()
            .filter(|id| !self.registry.contains(id))
            .map(str::to_string)
            .collect();
        self.report(sink, path, IssueKind::UnrecognizedBrowsers, unknown);

        let invalid: Vec<String> = support
            .browsers()
            .filter(|id| !self.sets.displayable.contains(*id))
            .map(str::to_string)
            .collect();
        self.report(sink, path, IssueKind::InvalidForCategory, invalid);

        let missing: Vec<String> = self
            .sets
            .required
            .iter()
            .filter(|id| !support.contains(id))
            .cloned()
            .collect();
        self.report(sink, path, IssueKind::MissingRequired, missing);
    }

    fn report<S: IssueSink + ?Sized>(
        &self,
        sink: &mut S,
        path: &str,
        kind: IssueKind,
        browsers: Vec<String>,
    ) {
        if browsers.is_empty() {
            return;
        }
        tracing::debug!(path, ?kind, browsers = ?browsers, "presence issue");
        sink.report(Issue {
            path: path.to_string(),
            kind,
            browsers,
            category: self.category.clone(),
        });
    }
}

/// Check a feature tree for browser-presence issues.
///
/// Classifies the registry for `category` once, then validates every node.
pub fn check_browser_presence<S: IssueSink + ?Sized>(
    tree: &FeatureNode,
    category: &Category,
    registry: &BrowserRegistry,
    sink: &mut S,
) {
    PresenceChecker::new(registry, category.clone()).check(tree, sink);
}

/// Validate `node` and its descendants against precomputed browser sets.
///
/// `path` is the dotted path of `node`; pass an empty string for a root.
pub fn validate_node<S: IssueSink + ?Sized>(
    node: &FeatureNode,
    sets: &BrowserSetPair,
    category: &Category,
    registry: &BrowserRegistry,
    sink: &mut S,
    path: &str,
) {
    let checker = PresenceChecker {
        registry,
        category: category.clone(),
        sets: sets.clone(),
    };
    checker.visit(node, path, sink);
}
