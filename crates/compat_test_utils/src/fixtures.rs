//! Test fixtures and helpers.
//!
//! Pre-built registries and feature trees for consistent testing.

use compat_core::browsers::{BrowserDescriptor, BrowserRegistry, BrowserType};
use compat_core::data::{CompatBlock, FeatureNode, SupportTable};
use serde_json::{json, Value};

/// Small registry used throughout the examples.
///
/// | id               | type    | WebExtensions |
/// |------------------|---------|---------------|
/// | `chrome`         | desktop | yes           |
/// | `chrome_android` | mobile  | yes           |
/// | `deno`           | server  | no            |
/// | `firefox`        | desktop | yes           |
#[must_use]
pub fn example_registry() -> BrowserRegistry {
    [
        (
            "chrome",
            BrowserDescriptor::new(BrowserType::Desktop, true).named("Chrome"),
        ),
        (
            "firefox",
            BrowserDescriptor::new(BrowserType::Desktop, true).named("Firefox"),
        ),
        (
            "chrome_android",
            BrowserDescriptor::new(BrowserType::Mobile, true).named("Chrome Android"),
        ),
        (
            "deno",
            BrowserDescriptor::new(BrowserType::Server, false).named("Deno"),
        ),
    ]
    .into_iter()
    .collect()
}

/// The [`example_registry`] as an on-disk registry document.
#[must_use]
pub fn example_registry_json() -> Value {
    json!({
        "browsers": {
            "chrome": { "name": "Chrome", "type": "desktop", "accepts_webextensions": true },
            "firefox": { "name": "Firefox", "type": "desktop", "accepts_webextensions": true },
            "chrome_android": { "name": "Chrome Android", "type": "mobile", "accepts_webextensions": true },
            "deno": { "name": "Deno", "type": "server", "accepts_webextensions": false }
        }
    })
}

/// Support table with an empty statement for each browser.
#[must_use]
pub fn support_table(browsers: &[&str]) -> SupportTable {
    browsers
        .iter()
        .map(|id| (*id, json!({ "version_added": "1" })))
        .collect()
}

/// Feature node whose compat block lists `browsers`.
#[must_use]
pub fn feature_with_support(browsers: &[&str]) -> FeatureNode {
    FeatureNode::new().with_compat(CompatBlock::with_support(support_table(browsers)))
}

/// Wrap `leaf` in empty parent nodes along a dotted path.
///
/// `nest("api.Foo.bar", leaf)` returns a root whose `api.Foo.bar` is `leaf`.
#[must_use]
pub fn nest(path: &str, leaf: FeatureNode) -> FeatureNode {
    path.rsplit('.')
        .fold(leaf, |child, name| FeatureNode::new().with_child(name, child))
}

/// JSON document for a single feature under `category` with the given table.
#[must_use]
pub fn feature_document(category: &str, feature: &str, browsers: &[&str]) -> Value {
    let support: serde_json::Map<String, Value> = browsers
        .iter()
        .map(|id| ((*id).to_string(), json!({ "version_added": "1" })))
        .collect();
    json!({
        category: {
            feature: {
                "__compat": { "support": support }
            }
        }
    })
}
