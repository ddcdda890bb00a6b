//! Categories and the browser sets they select.
//!
//! Every data file belongs to a category taken from the first segment of its
//! path under the data root. The category decides which browsers may appear
//! in a support table (the *displayable* set) and which must (the *required*
//! set).

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Component, Path};

use serde::{Serialize, Serializer};

use crate::browsers::{BrowserRegistry, BrowserType};

/// Category of a compat data file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Category {
    /// Web platform APIs (`api/`).
    Api,
    /// JavaScript language features (`javascript/`).
    JavaScript,
    /// Browser extension APIs (`webextensions/`).
    WebExtensions,
    /// Any other top-level directory, e.g. `css` or `html`.
    Other(String),
    /// File sits directly in the data root.
    #[default]
    Uncategorized,
}

impl Category {
    /// Build a category from an optional label. Empty labels are uncategorized.
    #[must_use]
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            None | Some("") => Self::Uncategorized,
            Some("api") => Self::Api,
            Some("javascript") => Self::JavaScript,
            Some("webextensions") => Self::WebExtensions,
            Some(other) => Self::Other(other.to_string()),
        }
    }

    /// Derive the category from a path relative to the data root.
    ///
    /// The category is the first path segment, but only when the path has
    /// more than one segment; a file directly in the root has none.
    #[must_use]
    pub fn from_relative_path(relative: &Path) -> Self {
        let mut components = relative
            .components()
            .filter(|c| !matches!(c, Component::CurDir));
        let first = components.next();
        if components.next().is_none() {
            return Self::Uncategorized;
        }
        match first {
            Some(Component::Normal(segment)) => Self::from_label(segment.to_str()),
            _ => Self::Uncategorized,
        }
    }

    /// The label this category was built from, if any.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Api => Some("api"),
            Self::JavaScript => Some("javascript"),
            Self::WebExtensions => Some("webextensions"),
            Self::Other(label) => Some(label),
            Self::Uncategorized => None,
        }
    }

    /// Whether server runtimes may appear in this category's tables.
    #[must_use]
    pub fn allows_server_runtimes(&self) -> bool {
        matches!(self, Self::Api | Self::JavaScript)
    }

    /// Whether only browsers accepting WebExtensions count for this category.
    #[must_use]
    pub fn requires_webextensions(&self) -> bool {
        matches!(self, Self::WebExtensions)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().unwrap_or("(uncategorized)"))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.label() {
            Some(label) => serializer.serialize_str(label),
            None => serializer.serialize_none(),
        }
    }
}

/// Browsers a category permits and requires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BrowserSetPair {
    /// Browsers allowed to appear in a support table.
    pub displayable: BTreeSet<String>,
    /// Browsers that must appear in a support table.
    pub required: BTreeSet<String>,
}

/// Compute the displayable and required browser sets for a category.
///
/// Both sets pass through the same WebExtensions gate, so `required` is
/// always a subset of `displayable`.
#[must_use]
pub fn classify(category: &Category, registry: &BrowserRegistry) -> BrowserSetPair {
    let allows_server = category.allows_server_runtimes();
    let mut sets = BrowserSetPair::default();

    for (id, browser) in registry.iter() {
        if category.requires_webextensions() && !browser.accepts_webextensions {
            continue;
        }

        let displayable = match browser.browser_type {
            BrowserType::Desktop | BrowserType::Mobile | BrowserType::Xr => true,
            BrowserType::Server => allows_server,
            BrowserType::Other => false,
        };
        if displayable {
            sets.displayable.insert(id.to_string());
        }
        if browser.browser_type == BrowserType::Desktop {
            sets.required.insert(id.to_string());
        }
    }

    tracing::trace!(
        category = %category,
        displayable = sets.displayable.len(),
        required = sets.required.len(),
        "classified browsers"
    );

    sets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browsers::BrowserDescriptor;

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|id| (*id).to_string()).collect()
    }

    fn test_registry() -> BrowserRegistry {
        [
            ("chrome", BrowserDescriptor::new(BrowserType::Desktop, true)),
            ("firefox", BrowserDescriptor::new(BrowserType::Desktop, true)),
            ("ie", BrowserDescriptor::new(BrowserType::Desktop, false)),
            ("chrome_android", BrowserDescriptor::new(BrowserType::Mobile, true)),
            ("oculus", BrowserDescriptor::new(BrowserType::Xr, false)),
            ("deno", BrowserDescriptor::new(BrowserType::Server, false)),
            ("nodejs", BrowserDescriptor::new(BrowserType::Server, false)),
            ("kiosk", BrowserDescriptor::new(BrowserType::Other, true)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_from_label() {
        assert_eq!(Category::from_label(Some("api")), Category::Api);
        assert_eq!(Category::from_label(Some("javascript")), Category::JavaScript);
        assert_eq!(
            Category::from_label(Some("webextensions")),
            Category::WebExtensions
        );
        assert_eq!(
            Category::from_label(Some("css")),
            Category::Other("css".to_string())
        );
        assert_eq!(Category::from_label(Some("")), Category::Uncategorized);
        assert_eq!(Category::from_label(None), Category::Uncategorized);
    }

    #[test]
    fn test_from_relative_path() {
        assert_eq!(
            Category::from_relative_path(Path::new("api/AbortController.json")),
            Category::Api
        );
        assert_eq!(
            Category::from_relative_path(Path::new("webextensions/api/tabs.json")),
            Category::WebExtensions
        );
        assert_eq!(
            Category::from_relative_path(Path::new("./css/properties/color.json")),
            Category::Other("css".to_string())
        );
        assert_eq!(
            Category::from_relative_path(Path::new("index.json")),
            Category::Uncategorized
        );
        assert_eq!(
            Category::from_relative_path(Path::new("")),
            Category::Uncategorized
        );
    }

    #[test]
    fn test_display_and_label() {
        assert_eq!(Category::JavaScript.to_string(), "javascript");
        assert_eq!(Category::Other("html".to_string()).to_string(), "html");
        assert_eq!(Category::Uncategorized.to_string(), "(uncategorized)");
        assert_eq!(Category::Uncategorized.label(), None);
    }

    #[test]
    fn test_classify_api_includes_servers() {
        let sets = classify(&Category::Api, &test_registry());

        assert_eq!(
            sets.displayable,
            set(&["chrome", "chrome_android", "deno", "firefox", "ie", "nodejs", "oculus"])
        );
        assert_eq!(sets.required, set(&["chrome", "firefox", "ie"]));
    }

    #[test]
    fn test_classify_other_category_excludes_servers() {
        let sets = classify(&Category::Other("css".to_string()), &test_registry());

        assert_eq!(
            sets.displayable,
            set(&["chrome", "chrome_android", "firefox", "ie", "oculus"])
        );
        assert_eq!(sets.required, set(&["chrome", "firefox", "ie"]));
    }

    #[test]
    fn test_classify_uncategorized_matches_baseline() {
        let registry = test_registry();
        assert_eq!(
            classify(&Category::Uncategorized, &registry),
            classify(&Category::Other("html".to_string()), &registry)
        );
    }

    #[test]
    fn test_classify_webextensions_gate_applies_to_both_sets() {
        let sets = classify(&Category::WebExtensions, &test_registry());

        assert_eq!(sets.displayable, set(&["chrome", "chrome_android", "firefox"]));
        assert_eq!(sets.required, set(&["chrome", "firefox"]));
    }

    #[test]
    fn test_other_browser_type_never_displayable() {
        for category in [Category::Api, Category::WebExtensions, Category::Uncategorized] {
            let sets = classify(&category, &test_registry());
            assert!(!sets.displayable.contains("kiosk"));
            assert!(!sets.required.contains("kiosk"));
        }
    }

    #[test]
    fn test_classify_empty_registry() {
        let sets = classify(&Category::Api, &BrowserRegistry::new());
        assert!(sets.displayable.is_empty());
        assert!(sets.required.is_empty());
    }
}
