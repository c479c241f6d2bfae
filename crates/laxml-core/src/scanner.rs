//! The never-failing tokenizer.
//!
//! Classification happens one token at a time, pulled by the parser. There
//! is no error path: any construct that stops matching its grammar
//! re-enters the plain-text scan from the token's start, so malformed
//! input surfaces as an over-long `Text` token instead of a failure. Every
//! call consumes at least one character, which is what guarantees
//! termination on arbitrary input.

use crate::chars::{is_hex_digit, is_name_char, is_name_start_char, is_xml_whitespace};
use crate::input::{Cursor, Mark};
use crate::span::{Capture, Span};
use crate::token::{
    Attr, AttrValue, CloseKind, ClosingTag, EntityRef, OpeningTag, PiToken, Spanned,
    SpannedWithSpaces, Token,
};

/// Pull-based tokenizer over a cursor.
///
/// Construction computes the first token, so a fresh scanner is already
/// positioned at token 0.
pub struct Scanner<'a, S> {
    cursor: Cursor<'a, S>,
    current: Token<S>,
}

impl<'a, S: Capture<'a>> Scanner<'a, S> {
    pub fn new(mut cursor: Cursor<'a, S>) -> Self {
        let current = next_token(&mut cursor);
        Self { cursor, current }
    }

    /// The token at the cursor.
    #[inline]
    pub fn current(&self) -> &Token<S> {
        &self.current
    }

    /// Consume the current token and compute the next.
    #[inline]
    pub fn advance(&mut self) {
        self.current = next_token(&mut self.cursor);
    }

    /// Consume and return the current token, computing the next.
    #[inline]
    pub fn bump(&mut self) -> Token<S> {
        let next = next_token(&mut self.cursor);
        std::mem::replace(&mut self.current, next)
    }
}

fn next_token<'a, S: Capture<'a>>(cur: &mut Cursor<'a, S>) -> Token<S> {
    let start = cur.mark();
    match cur.current() {
        None => Token::Eof(cur.pos()),
        Some('<') => {
            cur.advance();
            match cur.current() {
                Some('/') => {
                    cur.advance();
                    scan_closing_tag(cur, &start)
                }
                Some('!') => {
                    cur.advance();
                    match cur.current() {
                        Some('-') => scan_comment(cur, &start),
                        Some('[') => scan_cdata(cur, &start),
                        // DOCTYPE and friends are not modeled; they fall
                        // through to text.
                        _ => scan_text(cur, &start),
                    }
                }
                Some('?') => {
                    cur.advance();
                    match cur.current() {
                        Some(c) if is_name_start_char(c) => scan_tag(cur, &start, true),
                        _ => scan_text(cur, &start),
                    }
                }
                Some(c) if is_name_start_char(c) => scan_tag(cur, &start, false),
                _ => scan_text(cur, &start),
            }
        }
        Some('&') => scan_entity_ref(cur, &start),
        _ => scan_text(cur, &start),
    }
}

/// Consume plain text up to the next `<`, `&`, or end of buffer, capturing
/// from `start`. Also the universal fallback: whatever a failed sub-scan
/// already consumed ends up inside the captured text.
fn scan_text<'a, S: Capture<'a>>(cur: &mut Cursor<'a, S>, start: &Mark) -> Token<S> {
    cur.advance_until2(b'<', b'&');
    let span = cur.capture(start);
    let value = span.raw().to_string();
    Token::Text(Spanned::new(span, value))
}

/// Entity reference: `&name;`, `&#digits;`, or `&#xhex;`. The cursor sits
/// on `&`.
fn scan_entity_ref<'a, S: Capture<'a>>(cur: &mut Cursor<'a, S>, start: &Mark) -> Token<S> {
    cur.advance();
    match cur.current() {
        Some('#') => {
            cur.advance();
            if cur.current() == Some('x') {
                cur.advance();
                if !matches!(cur.current(), Some(c) if is_hex_digit(c)) {
                    return scan_text(cur, start);
                }
                let digits_start = cur.offset();
                while matches!(cur.current(), Some(c) if is_hex_digit(c)) {
                    cur.advance();
                }
                let digits = cur.slice(digits_start, cur.offset());
                let name = format!("#x{}", digits);
                finish_entity_ref(cur, start, name)
            } else if matches!(cur.current(), Some(c) if c.is_ascii_digit()) {
                let digits_start = cur.offset();
                while matches!(cur.current(), Some(c) if c.is_ascii_digit()) {
                    cur.advance();
                }
                let digits = cur.slice(digits_start, cur.offset());
                let name = format!("#{}", digits);
                finish_entity_ref(cur, start, name)
            } else {
                scan_text(cur, start)
            }
        }
        _ => match read_identifier(cur) {
            Some(ident) => finish_entity_ref(cur, start, ident.value),
            None => scan_text(cur, start),
        },
    }
}

fn finish_entity_ref<'a, S: Capture<'a>>(
    cur: &mut Cursor<'a, S>,
    start: &Mark,
    name: String,
) -> Token<S> {
    if cur.current() != Some(';') {
        return scan_text(cur, start);
    }
    cur.advance();
    Token::EntityRef(EntityRef {
        name: Spanned::new(cur.capture(start), name),
    })
}

/// Comment body scan. The cursor sits on the first `-` of `<!--`; only the
/// exact sequence `-->` terminates.
fn scan_comment<'a, S: Capture<'a>>(cur: &mut Cursor<'a, S>, start: &Mark) -> Token<S> {
    cur.advance();
    if cur.current() != Some('-') {
        return scan_text(cur, start);
    }
    cur.advance();

    let body_start = cur.offset();
    match cur.find(b"-->") {
        Some(close) => {
            let body = cur.slice(body_start, close).to_string();
            cur.advance_to(close + 3);
            Token::Comment(Spanned::new(cur.capture(start), body))
        }
        None => {
            cur.advance_to_end();
            scan_text(cur, start)
        }
    }
}

/// CDATA section scan. The cursor sits on the `[` of `<![CDATA[`; only the
/// exact byte sequence `]]>` terminates, so stray `]` stays in the body.
fn scan_cdata<'a, S: Capture<'a>>(cur: &mut Cursor<'a, S>, start: &Mark) -> Token<S> {
    for expected in "[CDATA[".chars() {
        if cur.current() != Some(expected) {
            return scan_text(cur, start);
        }
        cur.advance();
    }

    let body_start = cur.offset();
    match cur.find(b"]]>") {
        Some(close) => {
            let body = cur.slice(body_start, close).to_string();
            cur.advance_to(close + 3);
            Token::Cdata(Spanned::new(cur.capture(start), body))
        }
        None => {
            cur.advance_to_end();
            scan_text(cur, start)
        }
    }
}

/// Closing tag: `</` (ws)? name (ws)? `>`. The cursor sits just past `</`.
fn scan_closing_tag<'a, S: Capture<'a>>(cur: &mut Cursor<'a, S>, start: &Mark) -> Token<S> {
    let open_span = cur.capture(start);
    let open_spaces = read_spaces(cur);

    let name = match read_identifier(cur) {
        Some(name) => name,
        None => return scan_text(cur, start),
    };
    let name_spaces = read_spaces(cur);

    let close = match read_literal(cur, ">") {
        Some(close) => close,
        None => return scan_text(cur, start),
    };

    Token::Closing(ClosingTag {
        open: SpannedWithSpaces::new(open_span, (), open_spaces),
        name: SpannedWithSpaces::new(name.span, name.value, name_spaces),
        close,
    })
}

/// Opening tag or processing instruction: name, then attributes until
/// `>`, `/>`, or (for `pi`) `?>`. The cursor sits on the name-start
/// character; `start` covers `<` or `<?`.
fn scan_tag<'a, S: Capture<'a>>(cur: &mut Cursor<'a, S>, start: &Mark, pi: bool) -> Token<S> {
    let open_span = cur.capture(start);

    let name = match read_identifier(cur) {
        Some(name) => name,
        None => return scan_text(cur, start),
    };
    let name_spaces = read_spaces(cur);

    let mut attrs: Vec<Attr<S>> = Vec::new();
    loop {
        match cur.current() {
            None => return scan_text(cur, start),
            Some('?') if pi => {
                let close = match read_literal(cur, "?>") {
                    Some(close) => close,
                    None => return scan_text(cur, start),
                };
                return Token::Pi(PiToken {
                    open: Spanned::new(open_span, ()),
                    name: SpannedWithSpaces::new(name.span, name.value, name_spaces),
                    attrs,
                    close,
                });
            }
            Some('>') => {
                let close = match read_literal(cur, ">") {
                    Some(close) => close,
                    None => return scan_text(cur, start),
                };
                return Token::Opening(OpeningTag {
                    open: Spanned::new(open_span, ()),
                    name: SpannedWithSpaces::new(name.span, name.value, name_spaces),
                    attrs,
                    close: Spanned::new(close.span, CloseKind::Greater),
                });
            }
            Some('/') => {
                let close = match read_literal(cur, "/>") {
                    Some(close) => close,
                    None => return scan_text(cur, start),
                };
                return Token::Opening(OpeningTag {
                    open: Spanned::new(open_span, ()),
                    name: SpannedWithSpaces::new(name.span, name.value, name_spaces),
                    attrs,
                    close: Spanned::new(close.span, CloseKind::SlashGreater),
                });
            }
            Some(c) if is_name_start_char(c) => match read_attributes(cur) {
                Some(mut read) => attrs.append(&mut read),
                None => return scan_text(cur, start),
            },
            _ => return scan_text(cur, start),
        }
    }
}

fn read_attributes<'a, S: Capture<'a>>(cur: &mut Cursor<'a, S>) -> Option<Vec<Attr<S>>> {
    let mut attrs = Vec::new();
    while matches!(cur.current(), Some(c) if is_name_start_char(c)) {
        attrs.push(read_attribute(cur)?);
    }
    Some(attrs)
}

fn read_attribute<'a, S: Capture<'a>>(cur: &mut Cursor<'a, S>) -> Option<Attr<S>> {
    let name = read_identifier(cur)?;
    let name_spaces = read_spaces(cur);

    let eq = read_literal(cur, "=")?;
    let eq_spaces = read_spaces(cur);

    let value = read_attr_value(cur)?;
    let value_spaces = read_spaces(cur);

    Some(Attr {
        name: SpannedWithSpaces::new(name.span, name.value, name_spaces),
        eq: SpannedWithSpaces::new(eq.span, (), eq_spaces),
        value: SpannedWithSpaces::new(value.span, value.value, value_spaces),
    })
}

/// Attribute value with type inference. Quoted values are always `Str`;
/// unquoted values are typed by their first character.
fn read_attr_value<'a, S: Capture<'a>>(cur: &mut Cursor<'a, S>) -> Option<Spanned<S, AttrValue>> {
    match cur.current()? {
        '"' => {
            let quoted = read_quoted(cur, '"')?;
            Some(Spanned::new(quoted.span, AttrValue::Str(quoted.value)))
        }
        '\'' => {
            let quoted = read_quoted(cur, '\'')?;
            Some(Spanned::new(quoted.span, AttrValue::Str(quoted.value)))
        }
        '>' | '/' => None,
        c if is_name_start_char(c) => {
            let Spanned { span, value } = read_identifier(cur)?;
            let typed = match value.as_str() {
                "true" => AttrValue::Bool(true),
                "false" => AttrValue::Bool(false),
                _ => AttrValue::Str(value),
            };
            Some(Spanned::new(span, typed))
        }
        c if c.is_ascii_digit() => read_int_or_real(cur),
        _ => None,
    }
}

/// Quoted value: `'...'` or `"..."` with `\n \r \t` escapes; any other
/// escaped character is taken literally.
fn read_quoted<'a, S: Capture<'a>>(
    cur: &mut Cursor<'a, S>,
    quote: char,
) -> Option<Spanned<S, String>> {
    let start = cur.mark();
    cur.advance();

    let mut buffer = String::new();
    loop {
        let c = cur.current()?;
        if c == quote {
            cur.advance();
            return Some(Spanned::new(cur.capture(&start), buffer));
        }
        if c == '\\' {
            cur.advance();
            let escaped = cur.current()?;
            match escaped {
                'n' => buffer.push('\n'),
                'r' => buffer.push('\r'),
                't' => buffer.push('\t'),
                other => buffer.push(other),
            }
            cur.advance();
        } else {
            buffer.push(c);
            cur.advance();
        }
    }
}

/// Unquoted numeric value. Digits alone are `Int`; a `.` commits to the
/// real scan. The stored value is always the original text.
fn read_int_or_real<'a, S: Capture<'a>>(cur: &mut Cursor<'a, S>) -> Option<Spanned<S, AttrValue>> {
    let start = cur.mark();
    loop {
        match cur.current() {
            Some(c) if c.is_ascii_digit() => cur.advance(),
            Some('.') => {
                cur.advance();
                let real = read_real(cur, &start)?;
                return Some(Spanned::new(real.span, AttrValue::Real(real.value)));
            }
            // Any other byte (or end of buffer) terminates the integer.
            _ => {
                let span = cur.capture(&start);
                let text = span.raw().to_string();
                return Some(Spanned::new(span, AttrValue::Int(text)));
            }
        }
    }
}

/// Real continuation after the `.`: digits, then an optional
/// `[eE][+-]?digits` exponent. Must terminate at whitespace, `>`, `/`, or
/// end of buffer; anything else fails the attribute.
fn read_real<'a, S: Capture<'a>>(cur: &mut Cursor<'a, S>, start: &Mark) -> Option<Spanned<S, String>> {
    loop {
        match cur.current() {
            None | Some('>') | Some('/') => return Some(capture_text(cur, start)),
            Some(c) if is_xml_whitespace(c) => return Some(capture_text(cur, start)),
            Some(c) if c.is_ascii_digit() => cur.advance(),
            Some('e') | Some('E') => {
                cur.advance();
                return read_exponent(cur, start);
            }
            _ => return None,
        }
    }
}

fn read_exponent<'a, S: Capture<'a>>(
    cur: &mut Cursor<'a, S>,
    start: &Mark,
) -> Option<Spanned<S, String>> {
    if matches!(cur.current(), Some('+') | Some('-')) {
        cur.advance();
    }
    if !matches!(cur.current(), Some(c) if c.is_ascii_digit()) {
        return None;
    }
    while matches!(cur.current(), Some(c) if c.is_ascii_digit()) {
        cur.advance();
    }
    Some(capture_text(cur, start))
}

fn capture_text<'a, S: Capture<'a>>(cur: &Cursor<'a, S>, start: &Mark) -> Spanned<S, String> {
    let span = cur.capture(start);
    let text = span.raw().to_string();
    Spanned::new(span, text)
}

fn read_spaces<'a, S: Capture<'a>>(cur: &mut Cursor<'a, S>) -> S {
    let start = cur.mark();
    while matches!(cur.current(), Some(c) if is_xml_whitespace(c)) {
        cur.advance();
    }
    cur.capture(&start)
}

fn read_identifier<'a, S: Capture<'a>>(cur: &mut Cursor<'a, S>) -> Option<Spanned<S, String>> {
    if !matches!(cur.current(), Some(c) if is_name_start_char(c)) {
        return None;
    }
    let start = cur.mark();
    let name_start = cur.offset();
    cur.advance();
    while matches!(cur.current(), Some(c) if is_name_char(c)) {
        cur.advance();
    }
    let name = cur.slice(name_start, cur.offset()).to_string();
    Some(Spanned::new(cur.capture(&start), name))
}

fn read_literal<'a, S: Capture<'a>>(cur: &mut Cursor<'a, S>, literal: &str) -> Option<Spanned<S, ()>> {
    let start = cur.mark();
    for expected in literal.chars() {
        if cur.current() != Some(expected) {
            cur.reset(start);
            return None;
        }
        cur.advance();
    }
    Some(Spanned::new(cur.capture(&start), ()))
}
