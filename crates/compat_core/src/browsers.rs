//! Browser registry: the canonical set of browsers compat data may refer to.

use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Serialize};

use crate::error::{CompatError, Result};

/// Kind of runtime a browser entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserType {
    /// Desktop browser.
    Desktop,
    /// Mobile browser.
    Mobile,
    /// Extended-reality headset browser.
    Xr,
    /// Server-side JavaScript runtime.
    Server,
    /// Anything the registry labels with a type this linter does not know.
    #[serde(other)]
    Other,
}

impl BrowserType {
    /// Lowercase label as it appears in registry files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
            Self::Xr => "xr",
            Self::Server => "server",
            Self::Other => "other",
        }
    }
}

/// Registry entry for a single browser.
///
/// Only the fields the presence rules need are kept; release history and
/// the rest of a registry entry are skipped during deserialization.
///
/// # Example JSON
///
/// ```json
/// {
///     "name": "Firefox",
///     "type": "desktop",
///     "accepts_webextensions": true,
///     "releases": { "...": "..." }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserDescriptor {
    /// Human-readable browser name.
    #[serde(default)]
    pub name: String,

    /// Runtime kind.
    #[serde(rename = "type")]
    pub browser_type: BrowserType,

    /// Whether the browser runs WebExtensions.
    #[serde(default)]
    pub accepts_webextensions: bool,
}

impl BrowserDescriptor {
    /// Create a descriptor without a display name.
    #[must_use]
    pub fn new(browser_type: BrowserType, accepts_webextensions: bool) -> Self {
        Self {
            name: String::new(),
            browser_type,
            accepts_webextensions,
        }
    }

    /// Set the display name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// On-disk shape of a registry file: `{ "browsers": { "<id>": { ... } } }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryDocument {
    /// Browser entries defined by this document.
    #[serde(default)]
    pub browsers: BTreeMap<String, BrowserDescriptor>,
}

impl RegistryDocument {
    /// Decode a registry document from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(CompatError::RegistryDecode)
    }
}

/// Mapping from browser identifier to its descriptor.
///
/// Iteration is ordered by identifier, so every set and issue derived from
/// the registry comes out in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserRegistry {
    browsers: BTreeMap<String, BrowserDescriptor>,
}

impl BrowserRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            browsers: BTreeMap::new(),
        }
    }

    /// Register a browser.
    ///
    /// # Errors
    ///
    /// Returns an error if a browser with the same ID is already registered.
    pub fn register(&mut self, id: impl Into<String>, descriptor: BrowserDescriptor) -> Result<()> {
        match self.browsers.entry(id.into()) {
            btree_map::Entry::Occupied(entry) => {
                Err(CompatError::DuplicateBrowser(entry.key().clone()))
            }
            btree_map::Entry::Vacant(entry) => {
                entry.insert(descriptor);
                Ok(())
            }
        }
    }

    /// Register every browser of a decoded registry document.
    ///
    /// # Errors
    ///
    /// Returns an error on the first identifier that is already registered.
    pub fn merge(&mut self, document: RegistryDocument) -> Result<()> {
        for (id, descriptor) in document.browsers {
            self.register(id, descriptor)?;
        }
        Ok(())
    }

    /// Build a registry from a single JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut registry = Self::new();
        registry.merge(RegistryDocument::from_json_str(json)?)?;
        Ok(registry)
    }

    /// Get a browser descriptor by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&BrowserDescriptor> {
        self.browsers.get(id)
    }

    /// Check if a browser is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.browsers.contains_key(id)
    }

    /// Iterate over all registered browsers in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BrowserDescriptor)> {
        self.browsers.iter().map(|(id, b)| (id.as_str(), b))
    }

    /// Get all registered browser IDs in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.browsers.keys().map(String::as_str)
    }

    /// Get the number of registered browsers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.browsers.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.browsers.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, BrowserDescriptor)> for BrowserRegistry {
    /// Collect entries into a registry; a repeated ID keeps the last entry.
    fn from_iter<I: IntoIterator<Item = (S, BrowserDescriptor)>>(iter: I) -> Self {
        Self {
            browsers: iter.into_iter().map(|(id, b)| (id.into(), b)).collect(),
        }
    }
}
