//! # laxml core
//!
//! A lenient, span-preserving XML parser.
//!
//! laxml accepts *any* byte stream that looks XML-ish: malformed constructs
//! degrade to text, mismatched tags are absorbed into ordinary recovery
//! nodes, and parsing never fails. In exchange it guarantees a byte-exact
//! round-trip — every token and tree node keeps spans for all of its
//! syntactic parts, so rendering a parsed document reproduces the original
//! input exactly, whitespace included.
//!
//! ## Quick Start
//!
//! ```rust
//! let doc = laxml_core::parse("<greeting kind=\"warm\">hello</greeting>");
//!
//! let root = doc.root().unwrap();
//! assert_eq!(root.name(), "greeting");
//! assert_eq!(doc.raw_xml(), "<greeting kind=\"warm\">hello</greeting>");
//! ```
//!
//! ## Error Recovery
//!
//! Broken nesting still parses; the problems are ordinary tree nodes that
//! can be collected afterwards:
//!
//! ```rust
//! let doc = laxml_core::parse("<root><a>X<b>Y</a></root>");
//!
//! assert_eq!(doc.invalid_tags().len(), 1);
//! assert_eq!(doc.raw_xml(), "<root><a>X<b>Y</a></root>");
//! ```
//!
//! ## Span Flavors
//!
//! The whole pipeline is generic over a span flavor: [`PosSpan`] records
//! line/column/offset positions, [`TextSpan`] stores only the covered text.
//! [`parse`] and [`parse_text_only`] pick the flavor; [`parse_with`]
//! accepts any [`Capture`] implementation.

pub mod chars;
pub mod element;
pub mod error;
pub mod input;
pub mod parser;
pub mod scanner;
pub mod span;
pub mod token;

pub use element::{Descendants, Document, Element, Tag};
pub use error::RootError;
pub use input::{Cursor, Mark};
pub use parser::{parse, parse_text_only, parse_with};
pub use scanner::Scanner;
pub use span::{Capture, CowStr, Pos, PosSpan, Span, TextSpan};
pub use token::{
    Attr, AttrValue, CloseKind, ClosingTag, EntityRef, OpeningTag, PiToken, Spanned,
    SpannedWithSpaces, Token,
};
