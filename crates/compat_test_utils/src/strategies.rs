//! Proptest strategies for registries, categories and feature trees.
//!
//! Browser identifiers are drawn from a small fixed pool so that generated
//! support tables overlap generated registries often enough to exercise
//! every rule.

use compat_core::browsers::{BrowserDescriptor, BrowserRegistry, BrowserType};
use compat_core::category::Category;
use compat_core::data::{CompatBlock, FeatureNode, SupportTable};
use proptest::prelude::*;
use serde_json::json;

/// Identifier pool shared by every strategy in this module.
pub const BROWSER_POOL: &[&str] = &[
    "chrome",
    "chrome_android",
    "deno",
    "edge",
    "firefox",
    "firefox_android",
    "nodejs",
    "oculus",
    "opera",
    "safari",
    "safari_ios",
    "webview_android",
];

/// Generate any browser type.
pub fn arb_browser_type() -> impl Strategy<Value = BrowserType> {
    prop_oneof![
        Just(BrowserType::Desktop),
        Just(BrowserType::Mobile),
        Just(BrowserType::Xr),
        Just(BrowserType::Server),
        Just(BrowserType::Other),
    ]
}

/// Generate a browser descriptor.
pub fn arb_descriptor() -> impl Strategy<Value = BrowserDescriptor> {
    (arb_browser_type(), any::<bool>())
        .prop_map(|(browser_type, webext)| BrowserDescriptor::new(browser_type, webext))
}

/// Generate a browser identifier from the pool.
pub fn arb_browser_id() -> impl Strategy<Value = String> {
    proptest::sample::select(BROWSER_POOL).prop_map(str::to_string)
}

/// Generate a registry over a subset of the pool.
pub fn arb_registry() -> impl Strategy<Value = BrowserRegistry> {
    proptest::collection::btree_map(arb_browser_id(), arb_descriptor(), 0..BROWSER_POOL.len())
        .prop_map(|browsers| browsers.into_iter().collect())
}

/// Generate a category, weighted towards the ones with special rules.
pub fn arb_category() -> impl Strategy<Value = Category> {
    prop_oneof![
        Just(Category::Api),
        Just(Category::JavaScript),
        Just(Category::WebExtensions),
        Just(Category::Uncategorized),
        "[a-z]{1,12}".prop_map(|label| Category::from_label(Some(label.as_str()))),
    ]
}

/// Generate a support table over a subset of the pool.
pub fn arb_support_table() -> impl Strategy<Value = SupportTable> {
    proptest::collection::btree_set(arb_browser_id(), 0..6).prop_map(|ids| {
        ids.into_iter()
            .map(|id| (id, json!({ "version_added": true })))
            .collect()
    })
}

/// Generate a feature tree up to `depth` levels below the root.
pub fn arb_feature_tree(depth: u32) -> impl Strategy<Value = FeatureNode> {
    let leaf = proptest::option::of(arb_support_table()).prop_map(|support| match support {
        Some(table) => FeatureNode::new().with_compat(CompatBlock::with_support(table)),
        None => FeatureNode::new(),
    });

    leaf.prop_recursive(depth, 64, 4, |inner| {
        (
            proptest::option::of(arb_support_table()),
            proptest::collection::btree_map("[a-z][a-zA-Z_]{0,7}", inner, 0..4),
        )
            .prop_map(|(support, children)| {
                let mut node = FeatureNode::new();
                if let Some(table) = support {
                    node = node.with_compat(CompatBlock::with_support(table));
                }
                for (name, child) in children {
                    node.insert_child(name, child);
                }
                node
            })
    })
}
