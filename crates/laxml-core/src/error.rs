//! Error type for the post-parse queries.
//!
//! Scanning and parsing never fail: malformed constructs degrade to text
//! tokens and mismatched tags become ordinary recovery nodes in the tree.
//! The only fallible operation is asking a document for its single root.

use std::fmt;

/// Why [`crate::Document::root`] could not produce a root tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootError {
    /// The document has no top-level tag at all.
    NoRootTag,
    /// The document has more than one top-level tag; the names are in
    /// document order.
    MultipleRootTags(Vec<String>),
}

impl fmt::Display for RootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RootError::NoRootTag => write!(f, "no root tag"),
            RootError::MultipleRootTags(names) => {
                write!(f, "multiple root tags: {}", names.join(", "))
            }
        }
    }
}

impl std::error::Error for RootError {}
