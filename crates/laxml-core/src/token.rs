//! Token types produced by the scanner.
//!
//! Every token keeps a span for each of its syntactic sub-parts — brackets,
//! names, attribute pieces, the whitespace between them — so the exact
//! original text is always recoverable. Values (names, bodies) are stored
//! alongside the spans; for typed attribute values the *textual* form is
//! kept so reconstruction never re-formats a number.

use crate::span::{Pos, Span};

/// A value paired with the span it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned<S, V> {
    pub span: S,
    pub value: V,
}

impl<S, V> Spanned<S, V> {
    #[inline]
    pub fn new(span: S, value: V) -> Self {
        Self { span, value }
    }
}

/// A spanned value plus the run of whitespace that followed it.
///
/// The trailing-whitespace span is what lets a reconstructed tag reproduce
/// the author's formatting between names, `=` signs, and values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedWithSpaces<S, V> {
    pub span: S,
    pub value: V,
    pub spaces: S,
}

impl<S, V> SpannedWithSpaces<S, V> {
    #[inline]
    pub fn new(span: S, value: V, spaces: S) -> Self {
        Self { span, value, spaces }
    }
}

/// A typed attribute value.
///
/// `Int` and `Real` keep the original digit string, not a parsed number, so
/// `score=007` round-trips exactly. `Bool` is the only variant carrying a
/// semantic value; its textual form is always exactly `true`/`false`.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Str(String),
    Int(String),
    Real(String),
    Bool(bool),
}

impl AttrValue {
    /// The literal textual form of the value.
    pub fn literal(&self) -> String {
        match self {
            AttrValue::Str(s) | AttrValue::Int(s) | AttrValue::Real(s) => s.clone(),
            AttrValue::Bool(b) => b.to_string(),
        }
    }

    /// The value with `&lt;`, `&gt;`, `&amp;` unescaped.
    ///
    /// Only the `Str` variant can contain entities; the other variants
    /// return their literal form.
    pub fn decoded(&self) -> String {
        match self {
            AttrValue::Str(s) => s
                .replace("&lt;", "<")
                .replace("&gt;", ">")
                .replace("&amp;", "&"),
            other => other.literal(),
        }
    }
}

/// One `name = value` attribute with all surrounding whitespace captured.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr<S> {
    pub name: SpannedWithSpaces<S, String>,
    pub eq: SpannedWithSpaces<S, ()>,
    pub value: SpannedWithSpaces<S, AttrValue>,
}

impl<S> Attr<S> {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name.value
    }

    #[inline]
    pub fn value(&self) -> &AttrValue {
        &self.value.value
    }
}

impl<S: Span> Attr<S> {
    pub(crate) fn for_each_span(&self, f: &mut impl FnMut(&S)) {
        f(&self.name.span);
        f(&self.name.spaces);
        f(&self.eq.span);
        f(&self.eq.spaces);
        f(&self.value.span);
        f(&self.value.spaces);
    }
}

/// How an opening tag ended: `>` or `/>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseKind {
    Greater,
    SlashGreater,
}

/// A processing instruction, `<?name attrs?>`.
#[derive(Debug, Clone, PartialEq)]
pub struct PiToken<S> {
    pub open: Spanned<S, ()>,
    pub name: SpannedWithSpaces<S, String>,
    pub attrs: Vec<Attr<S>>,
    pub close: Spanned<S, ()>,
}

impl<S: Span> PiToken<S> {
    pub fn for_each_span(&self, f: &mut impl FnMut(&S)) {
        f(&self.open.span);
        f(&self.name.span);
        f(&self.name.spaces);
        for attr in &self.attrs {
            attr.for_each_span(f);
        }
        f(&self.close.span);
    }
}

/// An opening tag, `<name attrs>` or `<name attrs/>`.
#[derive(Debug, Clone, PartialEq)]
pub struct OpeningTag<S> {
    pub open: Spanned<S, ()>,
    pub name: SpannedWithSpaces<S, String>,
    pub attrs: Vec<Attr<S>>,
    pub close: Spanned<S, CloseKind>,
}

impl<S> OpeningTag<S> {
    /// True iff the tag is self-closed (`/>`).
    #[inline]
    pub fn is_self_closing(&self) -> bool {
        self.close.value == CloseKind::SlashGreater
    }
}

impl<S: Span> OpeningTag<S> {
    pub fn for_each_span(&self, f: &mut impl FnMut(&S)) {
        f(&self.open.span);
        f(&self.name.span);
        f(&self.name.spaces);
        for attr in &self.attrs {
            attr.for_each_span(f);
        }
        f(&self.close.span);
    }
}

/// A closing tag, `</name>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosingTag<S> {
    pub open: SpannedWithSpaces<S, ()>,
    pub name: SpannedWithSpaces<S, String>,
    pub close: Spanned<S, ()>,
}

impl<S: Span> ClosingTag<S> {
    pub fn for_each_span(&self, f: &mut impl FnMut(&S)) {
        f(&self.open.span);
        f(&self.open.spaces);
        f(&self.name.span);
        f(&self.name.spaces);
        f(&self.close.span);
    }
}

/// An entity reference, `&name;`. The stored name excludes `&` and `;`;
/// numeric references store `#N` or `#xN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef<S> {
    pub name: Spanned<S, String>,
}

impl<S> EntityRef<S> {
    /// Resolve against the default entity set.
    ///
    /// `amp lt gt apos quot` and numeric references resolve to their
    /// character; anything else (including out-of-range code points)
    /// resolves to the literal `&name;` text.
    pub fn resolved(&self) -> String {
        let name = self.name.value.as_str();
        match name {
            "amp" => "&".to_string(),
            "lt" => "<".to_string(),
            "gt" => ">".to_string(),
            "apos" => "'".to_string(),
            "quot" => "\"".to_string(),
            _ => {
                if let Some(digits) = name.strip_prefix('#') {
                    let code_point = match digits.strip_prefix('x') {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => digits.parse().ok(),
                    };
                    if let Some(c) = code_point.and_then(char::from_u32) {
                        return c.to_string();
                    }
                }
                format!("&{};", name)
            }
        }
    }
}

/// One lexical token of the input.
///
/// `Comment` and `Cdata` values hold the body between the delimiters; the
/// span still covers the delimiters, so rendering stays exact.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<S> {
    Eof(Pos),
    Comment(Spanned<S, String>),
    Text(Spanned<S, String>),
    Cdata(Spanned<S, String>),
    EntityRef(EntityRef<S>),
    Pi(PiToken<S>),
    Opening(OpeningTag<S>),
    Closing(ClosingTag<S>),
}

impl<S: Span> Token<S> {
    /// Visit every leaf span of this token, in document order.
    pub fn for_each_span(&self, f: &mut impl FnMut(&S)) {
        match self {
            Token::Eof(_) => {}
            Token::Comment(spanned) | Token::Text(spanned) | Token::Cdata(spanned) => {
                f(&spanned.span)
            }
            Token::EntityRef(entity) => f(&entity.name.span),
            Token::Pi(pi) => pi.for_each_span(f),
            Token::Opening(tag) => tag.for_each_span(f),
            Token::Closing(tag) => tag.for_each_span(f),
        }
    }

    /// Append the exact original text of this token to `out`.
    pub fn write_raw(&self, out: &mut String) {
        self.for_each_span(&mut |span| out.push_str(span.raw()));
    }

    /// The exact original text of this token.
    pub fn raw_xml(&self) -> String {
        let mut out = String::new();
        self.write_raw(&mut out);
        out
    }
}
