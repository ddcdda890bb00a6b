//! Validation issues and the sink they are reported to.

use std::fmt;

use serde::Serialize;

use crate::category::Category;

/// Which presence rule an issue violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Support table names browsers missing from the registry.
    UnrecognizedBrowsers,
    /// Support table names browsers not displayable for the category.
    InvalidForCategory,
    /// Support table lacks browsers the category requires.
    MissingRequired,
}

impl IssueKind {
    /// Sentence fragment describing the rule, placed between the path and
    /// the browser list when an issue is rendered.
    #[must_use]
    pub fn describe(&self, category: &Category) -> String {
        match self {
            Self::UnrecognizedBrowsers => {
                "has the following browsers, which are not defined in the registry".to_string()
            }
            Self::InvalidForCategory => format!(
                "has the following browsers, which are invalid for {category} compat data"
            ),
            Self::MissingRequired => format!(
                "is missing the following browsers, which are required for {category} compat data"
            ),
        }
    }
}

/// One presence finding at a feature path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Dotted feature path; empty for the document root.
    pub path: String,
    /// Rule that was violated.
    pub kind: IssueKind,
    /// Offending browser identifiers.
    pub browsers: Vec<String>,
    /// Category the rule was evaluated for.
    pub category: Category,
}

impl Issue {
    /// Path as shown to users; the root is rendered as `(root)`.
    #[must_use]
    pub fn display_path(&self) -> &str {
        if self.path.is_empty() {
            "(root)"
        } else {
            &self.path
        }
    }

    /// Offending browsers joined for display.
    #[must_use]
    pub fn browser_list(&self) -> String {
        self.browsers.join(", ")
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {}",
            self.display_path(),
            self.kind.describe(&self.category),
            self.browser_list()
        )
    }
}

/// Receiver of issues found during a traversal.
pub trait IssueSink {
    /// Record one issue.
    fn report(&mut self, issue: Issue);

    /// Whether anything has been reported.
    fn has_issues(&self) -> bool;
}

impl IssueSink for Vec<Issue> {
    fn report(&mut self, issue: Issue) {
        self.push(issue);
    }

    fn has_issues(&self) -> bool {
        !self.is_empty()
    }
}
