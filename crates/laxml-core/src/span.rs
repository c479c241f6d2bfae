//! Source span flavors for lossless reconstruction.
//!
//! Every token sub-part (brackets, names, attribute pieces, inter-token
//! whitespace) carries a span. Concatenating the spans of a parsed tree in
//! document order reproduces the input byte-for-byte, so spans are the
//! round-trip mechanism, not just diagnostics.
//!
//! Two flavors exist: [`TextSpan`] stores only the covered text, [`PosSpan`]
//! additionally stores start/end positions. The scanner and parser are
//! generic over the flavor via the [`Span`] and [`Capture`] traits.

use std::borrow::Cow;

/// Borrowed or owned string type for zero-copy spans.
pub type CowStr<'a> = Cow<'a, str>;

/// A line/column/byte position in the source text.
///
/// Lines and columns are 1-based; `offset` is a byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

impl Pos {
    /// The position before the first character of the input.
    pub const START: Pos = Pos {
        line: 1,
        column: 1,
        offset: 0,
    };
}

/// Capability trait for span flavors.
///
/// `combine` is concatenation: combining two adjacent spans yields a span
/// covering both, which is how merged text nodes keep exact coverage.
pub trait Span: Clone {
    /// The exact source text this span covers.
    fn raw(&self) -> &str;

    /// Concatenate two adjacent spans, in order.
    fn combine(a: Self, b: Self) -> Self;

    /// Mint a span for programmatically built markup.
    fn synthetic(text: &str) -> Self;
}

/// Span flavors the cursor can mint from borrowed input.
///
/// Split from [`Span`] so the token and element types stay free of lifetime
/// parameters while the cursor can still produce zero-copy spans.
pub trait Capture<'a>: Span {
    /// Build a span covering `text`, which lies between `start` and `end`
    /// in the original input.
    fn capture(text: &'a str, start: Pos, end: Pos) -> Self;
}

/// Text-only span: stores the covered text and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan<'a> {
    pub text: CowStr<'a>,
}

impl Span for TextSpan<'_> {
    #[inline]
    fn raw(&self) -> &str {
        &self.text
    }

    fn combine(a: Self, b: Self) -> Self {
        let mut text = a.text.into_owned();
        text.push_str(&b.text);
        TextSpan {
            text: Cow::Owned(text),
        }
    }

    fn synthetic(text: &str) -> Self {
        TextSpan {
            text: Cow::Owned(text.to_string()),
        }
    }
}

impl<'a> Capture<'a> for TextSpan<'a> {
    #[inline]
    fn capture(text: &'a str, _start: Pos, _end: Pos) -> Self {
        TextSpan {
            text: Cow::Borrowed(text),
        }
    }
}

/// Positional span: the covered text plus its start/end positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosSpan<'a> {
    pub text: CowStr<'a>,
    pub start: Pos,
    pub end: Pos,
}

impl Span for PosSpan<'_> {
    #[inline]
    fn raw(&self) -> &str {
        &self.text
    }

    fn combine(a: Self, b: Self) -> Self {
        let mut text = a.text.into_owned();
        text.push_str(&b.text);
        PosSpan {
            text: Cow::Owned(text),
            start: a.start,
            end: b.end,
        }
    }

    fn synthetic(text: &str) -> Self {
        PosSpan {
            text: Cow::Owned(text.to_string()),
            start: Pos::START,
            end: Pos::START,
        }
    }
}

impl<'a> Capture<'a> for PosSpan<'a> {
    #[inline]
    fn capture(text: &'a str, start: Pos, end: Pos) -> Self {
        PosSpan {
            text: Cow::Borrowed(text),
            start,
            end,
        }
    }
}
