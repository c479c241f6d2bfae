//! Tree builder with mismatched-tag recovery.
//!
//! The parser drives the scanner token by token, keeping a stack of open
//! tags. Tag mismatches never fail: a closing tag with no opener becomes an
//! [`Element::UnopenedTag`] leaf, and when a closer matches an outer open
//! tag, everything open above it is collapsed — each abandoned opener
//! becomes an [`Element::UnclosedTag`] leaf and its accumulated children
//! are spliced into the parent in document order. End of input unwinds the
//! remaining open tags the same way.
//!
//! Adjacent text nodes are merged at every insertion point, including the
//! splicing above, so no finished tree ever holds two `Text` siblings in a
//! row.

use crate::element::{Document, Element, Tag};
use crate::input::Cursor;
use crate::scanner::Scanner;
use crate::span::{Capture, PosSpan, Span, TextSpan};
use crate::token::{OpeningTag, Spanned, Token};

/// Parse with full position tracking.
pub fn parse(input: &str) -> Document<PosSpan<'_>> {
    parse_with(Cursor::new(input))
}

/// Parse with text-only spans (cheaper when positions are not needed).
pub fn parse_text_only(input: &str) -> Document<TextSpan<'_>> {
    parse_with(Cursor::new(input))
}

/// Parse with a custom span flavor.
pub fn parse_with<'a, S: Capture<'a>>(cursor: Cursor<'a, S>) -> Document<S> {
    parse_tokens(Scanner::new(cursor))
}

/// Children of one frame, with the text-merge rule applied on every push.
struct Children<S>(Vec<Element<S>>);

impl<S: Span> Children<S> {
    fn new() -> Self {
        Children(Vec::new())
    }

    fn push(&mut self, element: Element<S>) {
        if let Element::Text(next) = element {
            if matches!(self.0.last(), Some(Element::Text(_))) {
                if let Some(Element::Text(prev)) = self.0.pop() {
                    self.0.push(Element::Text(Spanned::new(
                        S::combine(prev.span, next.span),
                        prev.value + &next.value,
                    )));
                    return;
                }
            }
            self.0.push(Element::Text(next));
        } else {
            self.0.push(element);
        }
    }

    fn extend(&mut self, elements: Vec<Element<S>>) {
        for element in elements {
            self.push(element);
        }
    }
}

/// One open tag awaiting its closer.
struct Frame<S> {
    open: OpeningTag<S>,
    children: Children<S>,
}

/// The parse stack: the document's top-level children plus the open frames
/// above them. Keeping the root outside the frame list means every frame
/// has a real opening token, with no sentinel to check.
struct Stack<S> {
    root: Children<S>,
    frames: Vec<Frame<S>>,
}

impl<S: Span> Stack<S> {
    fn push_element(&mut self, element: Element<S>) {
        match self.frames.last_mut() {
            Some(frame) => frame.children.push(element),
            None => self.root.push(element),
        }
    }

    fn extend_elements(&mut self, elements: Vec<Element<S>>) {
        match self.frames.last_mut() {
            Some(frame) => frame.children.extend(elements),
            None => self.root.extend(elements),
        }
    }

    /// Collapse the top frame without a closer: the opener becomes an
    /// `UnclosedTag` leaf and the children escape into the parent.
    fn collapse_top(&mut self) {
        if let Some(frame) = self.frames.pop() {
            self.push_element(Element::UnclosedTag(frame.open));
            self.extend_elements(frame.children.0);
        }
    }
}

fn parse_tokens<'a, S: Capture<'a>>(mut scanner: Scanner<'a, S>) -> Document<S> {
    let mut stack = Stack {
        root: Children::new(),
        frames: Vec::new(),
    };

    loop {
        match scanner.bump() {
            Token::Pi(pi) => stack.push_element(Element::Pi(pi)),
            Token::Text(text) => stack.push_element(Element::Text(text)),
            Token::Cdata(cdata) => stack.push_element(Element::Cdata(cdata)),
            Token::EntityRef(entity) => stack.push_element(Element::EntityRef(entity)),
            Token::Comment(comment) => stack.push_element(Element::Comment(comment)),

            Token::Opening(opening) => {
                if opening.is_self_closing() {
                    stack.push_element(Element::Tag(Tag {
                        open: opening,
                        close: None,
                        children: Vec::new(),
                    }));
                } else {
                    stack.frames.push(Frame {
                        open: opening,
                        children: Children::new(),
                    });
                }
            }

            Token::Closing(closing) => {
                // Nearest enclosing open tag with the same name, if any.
                let matching = stack
                    .frames
                    .iter()
                    .rposition(|frame| frame.open.name.value == closing.name.value);

                match matching {
                    None => {
                        // Stray closer: nothing open anywhere matches it.
                        stack.push_element(Element::UnopenedTag(closing));
                    }
                    Some(depth) => {
                        // Abandon everything open above the match, then
                        // close the matching frame normally.
                        while stack.frames.len() > depth + 1 {
                            stack.collapse_top();
                        }
                        if let Some(frame) = stack.frames.pop() {
                            stack.push_element(Element::Tag(Tag {
                                open: frame.open,
                                close: Some(closing),
                                children: frame.children.0,
                            }));
                        }
                    }
                }
            }

            Token::Eof(_) => {
                while !stack.frames.is_empty() {
                    stack.collapse_top();
                }
                return Document {
                    children: stack.root.0,
                };
            }
        }
    }
}
