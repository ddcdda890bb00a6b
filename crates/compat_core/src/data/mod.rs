//! Data structures for compatibility data documents.
//!
//! This module contains pure data structures for feature trees and their
//! support tables. All structs deserialize from the JSON documents the
//! dataset is stored as.
//!
//! **Note:** This module contains no IO - it only defines data types.
//! File loading is handled by `compat_tools`.

mod feature;
mod support;

pub use feature::{CompatBlock, FeatureNode, COMPAT_KEY};
pub use support::{SupportStatement, SupportTable};
