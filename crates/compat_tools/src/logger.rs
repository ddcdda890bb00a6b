//! Issue reporter for lint runs.
//!
//! A [`Logger`] collects the issues one test produces for one file and
//! renders them as an indented, optionally ANSI-styled block.

use std::io::{self, Write};

use compat_core::issue::{Issue, IssueKind, IssueSink};
use serde::Serialize;

/// ANSI color codes.
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
}

/// Escape sequences used when rendering; all empty when color is off.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    reset: &'static str,
    bold: &'static str,
    red: &'static str,
    green: &'static str,
}

impl Style {
    /// Pick ANSI styling or plain text.
    #[must_use]
    pub const fn new(use_color: bool) -> Self {
        if use_color {
            Self {
                reset: colors::RESET,
                bold: colors::BOLD,
                red: colors::RED,
                green: colors::GREEN,
            }
        } else {
            Self {
                reset: "",
                bold: "",
                red: "",
                green: "",
            }
        }
    }

    /// Wrap `text` in bold.
    #[must_use]
    pub fn bold(&self, text: &str) -> String {
        format!("{}{text}{}", self.bold, self.reset)
    }

    /// Wrap `text` in red.
    #[must_use]
    pub fn red(&self, text: &str) -> String {
        format!("{}{text}{}", self.red, self.reset)
    }

    /// Wrap `text` in green.
    #[must_use]
    pub fn green(&self, text: &str) -> String {
        format!("{}{text}{}", self.green, self.reset)
    }
}

/// Titled collection of issues.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Logger {
    title: String,
    issues: Vec<Issue>,
}

impl Logger {
    /// Create an empty logger for the named test.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            issues: Vec::new(),
        }
    }

    /// Title shown above the issues.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Issues in the order they were reported.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Whether any issue was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Render one issue as a single line.
    #[must_use]
    pub fn format_issue(issue: &Issue, style: Style) -> String {
        let line = format!(
            "{} {}: {}",
            style.bold(issue.display_path()),
            issue.kind.describe(&issue.category),
            style.bold(&issue.browser_list()),
        );
        match issue.kind {
            IssueKind::UnrecognizedBrowsers => style.red(&format!("→ {line}")),
            IssueKind::InvalidForCategory | IssueKind::MissingRequired => line,
        }
    }

    /// Write the collected issues, if any, under a header line.
    ///
    /// Nothing is written when no issue was recorded.
    pub fn emit<W: Write>(&self, out: &mut W, style: Style) -> io::Result<()> {
        if self.issues.is_empty() {
            return Ok(());
        }

        let count = self.issues.len();
        let noun = if count == 1 { "problem" } else { "problems" };
        writeln!(
            out,
            "  {}",
            style.red(&format!("{} – {count} {noun}:", self.title))
        )?;
        for issue in &self.issues {
            writeln!(out, "    {}", Self::format_issue(issue, style))?;
        }
        Ok(())
    }
}

impl IssueSink for Logger {
    fn report(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    fn has_issues(&self) -> bool {
        self.has_errors()
    }
}
