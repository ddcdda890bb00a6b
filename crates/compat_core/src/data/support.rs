//! Support tables: which browsers a feature entry makes statements for.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Support statement for one browser.
///
/// The presence rules never look inside a statement, so it stays untyped.
pub type SupportStatement = Value;

/// Mapping from browser identifier to support statement.
///
/// Keeps document order. A key repeated in the source keeps its first
/// position and takes the last value, the same as a JSON object lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupportTable {
    entries: Vec<(String, SupportStatement)>,
}

impl SupportTable {
    /// Create an empty support table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the statement for a browser, replacing any earlier one.
    pub fn insert(&mut self, browser: impl Into<String>, statement: SupportStatement) {
        let browser = browser.into();
        match self.entries.iter_mut().find(|(id, _)| *id == browser) {
            Some((_, existing)) => *existing = statement,
            None => self.entries.push((browser, statement)),
        }
    }

    /// Check if the table has an entry for a browser.
    #[must_use]
    pub fn contains(&self, browser: &str) -> bool {
        self.entries.iter().any(|(id, _)| id == browser)
    }

    /// Get the statement for a browser.
    #[must_use]
    pub fn get(&self, browser: &str) -> Option<&SupportStatement> {
        self.entries
            .iter()
            .find(|(id, _)| id == browser)
            .map(|(_, statement)| statement)
    }

    /// Browser identifiers in document order.
    pub fn browsers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    /// Number of browsers in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, SupportStatement)> for SupportTable {
    fn from_iter<I: IntoIterator<Item = (S, SupportStatement)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (browser, statement) in iter {
            table.insert(browser, statement);
        }
        table
    }
}

impl Serialize for SupportTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(id, statement)| (id, statement)))
    }
}

impl<'de> Deserialize<'de> for SupportTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SupportTableVisitor;

        impl<'de> Visitor<'de> for SupportTableVisitor {
            type Value = SupportTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of browser identifiers to support statements")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<SupportTable, A::Error> {
                let mut table = SupportTable::new();
                while let Some((browser, statement)) =
                    map.next_entry::<String, SupportStatement>()?
                {
                    table.insert(browser, statement);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(SupportTableVisitor)
    }
}
