//! # Compat Core
//!
//! Browser-presence rules for compatibility data.
//!
//! This crate contains **only** the decision logic:
//! - No file IO
//! - No terminal output
//! - No global state (the registry is always passed in)
//!
//! Loading files, deriving categories from disk locations and printing
//! reports live in `compat_tools`.
//!
//! ## Crate Structure
//!
//! - [`browsers`] - Browser registry and descriptors
//! - [`category`] - Categories and the browser sets they select
//! - [`data`] - Feature tree and support table data types
//! - [`presence`] - Tree traversal applying the presence rules
//! - [`issue`] - Structured findings and the sink they go to

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod browsers;
pub mod category;
pub mod data;
pub mod error;
pub mod issue;
pub mod presence;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::browsers::{BrowserDescriptor, BrowserRegistry, BrowserType};
    pub use crate::category::{classify, BrowserSetPair, Category};
    pub use crate::data::{CompatBlock, FeatureNode, SupportTable};
    pub use crate::error::{CompatError, Result};
    pub use crate::issue::{Issue, IssueKind, IssueSink};
    pub use crate::presence::{check_browser_presence, validate_node, PresenceChecker};
}
