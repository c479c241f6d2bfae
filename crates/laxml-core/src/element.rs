//! Document tree types and query surface.
//!
//! Elements parallel the tokens they were built from, plus the structural
//! [`Tag`] node and the two recovery artifacts [`Element::UnopenedTag`] and
//! [`Element::UnclosedTag`]. Recovery artifacts are ordinary nodes, not
//! errors: a document-wide [`Document::invalid_tags`] scan surfaces every
//! problem after the fact, and the tree still renders the input exactly.

use std::borrow::Cow;

use crate::error::RootError;
use crate::span::Span;
use crate::token::{
    Attr, AttrValue, CloseKind, ClosingTag, EntityRef, OpeningTag, PiToken, Spanned,
    SpannedWithSpaces,
};

/// One node of the parsed tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Element<S> {
    Pi(PiToken<S>),
    Text(Spanned<S, String>),
    Cdata(Spanned<S, String>),
    EntityRef(EntityRef<S>),
    Comment(Spanned<S, String>),
    Tag(Tag<S>),
    /// A closing tag that matched no open tag.
    UnopenedTag(ClosingTag<S>),
    /// An opening tag forcibly terminated without a matching closer; its
    /// children were spliced into the surrounding parent.
    UnclosedTag(OpeningTag<S>),
}

/// A matched tag pair and its children. `close` is absent only for
/// self-closed tags.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag<S> {
    pub open: OpeningTag<S>,
    pub close: Option<ClosingTag<S>>,
    pub children: Vec<Element<S>>,
}

impl<S> Element<S> {
    /// True for the two recovery artifacts.
    #[inline]
    pub fn is_invalid_tag(&self) -> bool {
        matches!(self, Element::UnopenedTag(_) | Element::UnclosedTag(_))
    }
}

impl<S: Span> Element<S> {
    /// Visit every leaf span reachable from this element, depth-first in
    /// document order. Concatenating the visited raw texts reproduces the
    /// original input slice exactly.
    pub fn for_each_span(&self, f: &mut impl FnMut(&S)) {
        match self {
            Element::Pi(pi) => pi.for_each_span(f),
            Element::Text(spanned) | Element::Cdata(spanned) | Element::Comment(spanned) => {
                f(&spanned.span)
            }
            Element::EntityRef(entity) => f(&entity.name.span),
            Element::Tag(tag) => tag.for_each_span(f),
            Element::UnopenedTag(closing) => closing.for_each_span(f),
            Element::UnclosedTag(opening) => opening.for_each_span(f),
        }
    }

    /// Append the exact original text of this element to `out`.
    pub fn write_raw(&self, out: &mut String) {
        self.for_each_span(&mut |span| out.push_str(span.raw()));
    }

    /// The exact original text of this element.
    pub fn raw_xml(&self) -> String {
        let mut out = String::new();
        self.write_raw(&mut out);
        out
    }

    /// Text-like view: the body of a `Text` or `Cdata` node, or the
    /// resolved character of an `EntityRef`. `None` for everything else.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            Element::Text(spanned) | Element::Cdata(spanned) => {
                Some(Cow::Borrowed(spanned.value.as_str()))
            }
            Element::EntityRef(entity) => Some(Cow::Owned(entity.resolved())),
            _ => None,
        }
    }

    /// Pre-order iterator over all nodes below this one, excluding self.
    pub fn descendants(&self) -> Descendants<'_, S> {
        match self {
            Element::Tag(tag) => tag.descendants(),
            _ => Descendants { stack: Vec::new() },
        }
    }
}

impl<S: Span> Tag<S> {
    #[inline]
    pub fn name(&self) -> &str {
        &self.open.name.value
    }

    #[inline]
    pub fn attrs(&self) -> &[Attr<S>] {
        &self.open.attrs
    }

    /// First attribute with the given name, if any.
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.open
            .attrs
            .iter()
            .find(|attr| attr.name() == name)
            .map(|attr| attr.value())
    }

    /// First direct child tag with the given name, if any.
    pub fn child(&self, name: &str) -> Option<&Tag<S>> {
        self.child_tags().find(|tag| tag.name() == name)
    }

    /// All direct child tags with the given name.
    pub fn children_named<'t>(&'t self, name: &'t str) -> impl Iterator<Item = &'t Tag<S>> {
        self.child_tags().filter(move |tag| tag.name() == name)
    }

    /// All direct child tags.
    pub fn child_tags(&self) -> impl Iterator<Item = &Tag<S>> {
        self.children.iter().filter_map(|child| match child {
            Element::Tag(tag) => Some(tag),
            _ => None,
        })
    }

    /// Find a tag matching `predicate`: checks self, then each child tag,
    /// then (if `recursive`) descends into unmatched child tags.
    pub fn find_tag<F>(&self, recursive: bool, predicate: F) -> Option<&Tag<S>>
    where
        F: Fn(&Tag<S>) -> bool,
    {
        self.find_tag_inner(recursive, &predicate)
    }

    fn find_tag_inner(&self, recursive: bool, predicate: &dyn Fn(&Tag<S>) -> bool) -> Option<&Tag<S>> {
        if predicate(self) {
            return Some(self);
        }
        for child in self.child_tags() {
            if predicate(child) {
                return Some(child);
            }
            if recursive {
                if let Some(found) = child.find_tag_inner(recursive, predicate) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// The exact original text between this tag's brackets: the raw spans
    /// of all children concatenated, nested markup included verbatim.
    pub fn inner_raw_text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_raw(&mut out);
        }
        out
    }

    pub fn for_each_span(&self, f: &mut impl FnMut(&S)) {
        self.open.for_each_span(f);
        for child in &self.children {
            child.for_each_span(f);
        }
        if let Some(close) = &self.close {
            close.for_each_span(f);
        }
    }

    /// The exact original text of this tag.
    pub fn raw_xml(&self) -> String {
        let mut out = String::new();
        self.for_each_span(&mut |span| out.push_str(span.raw()));
        out
    }

    /// Pre-order iterator over all nodes below this tag, excluding self.
    pub fn descendants(&self) -> Descendants<'_, S> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    /// Build a tag programmatically, synthesizing canonical spans: a single
    /// space before the first attribute and between attributes, `Str`
    /// values double-quoted, `/>` when there are no children.
    pub fn build(name: &str, attrs: Vec<(String, AttrValue)>, children: Vec<Element<S>>) -> Tag<S> {
        let self_closing = children.is_empty();
        let attr_count = attrs.len();

        let built_attrs: Vec<Attr<S>> = attrs
            .into_iter()
            .enumerate()
            .map(|(i, (attr_name, value))| {
                let rendered = match &value {
                    AttrValue::Str(s) => format!("\"{}\"", s),
                    other => other.literal(),
                };
                let gap = if i + 1 < attr_count { " " } else { "" };
                Attr {
                    name: SpannedWithSpaces::new(
                        S::synthetic(&attr_name),
                        attr_name.clone(),
                        S::synthetic(""),
                    ),
                    eq: SpannedWithSpaces::new(S::synthetic("="), (), S::synthetic("")),
                    value: SpannedWithSpaces::new(S::synthetic(&rendered), value, S::synthetic(gap)),
                }
            })
            .collect();

        let name_gap = if built_attrs.is_empty() { "" } else { " " };
        let open = OpeningTag {
            open: Spanned::new(S::synthetic("<"), ()),
            name: SpannedWithSpaces::new(S::synthetic(name), name.to_string(), S::synthetic(name_gap)),
            attrs: built_attrs,
            close: if self_closing {
                Spanned::new(S::synthetic("/>"), CloseKind::SlashGreater)
            } else {
                Spanned::new(S::synthetic(">"), CloseKind::Greater)
            },
        };

        let close = if self_closing {
            None
        } else {
            Some(ClosingTag {
                open: SpannedWithSpaces::new(S::synthetic("</"), (), S::synthetic("")),
                name: SpannedWithSpaces::new(S::synthetic(name), name.to_string(), S::synthetic("")),
                close: Spanned::new(S::synthetic(">"), ()),
            })
        };

        Tag {
            open,
            close,
            children,
        }
    }
}

/// Pre-order traversal of a subtree, excluding the starting node.
pub struct Descendants<'t, S> {
    stack: Vec<std::slice::Iter<'t, Element<S>>>,
}

impl<'t, S> Iterator for Descendants<'t, S> {
    type Item = &'t Element<S>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let iter = self.stack.last_mut()?;
            match iter.next() {
                Some(element) => {
                    if let Element::Tag(tag) = element {
                        self.stack.push(tag.children.iter());
                    }
                    return Some(element);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// A parsed document: the ordered top-level elements.
///
/// A document may hold any mix of tags, text, comments, and processing
/// instructions at top level; [`Document::root`] is the strict accessor for
/// the single-root case.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<S> {
    pub children: Vec<Element<S>>,
}

impl<S: Span> Document<S> {
    /// The single top-level tag.
    ///
    /// Fails with [`RootError::NoRootTag`] when no top-level tag exists and
    /// [`RootError::MultipleRootTags`] when more than one does.
    pub fn root(&self) -> Result<&Tag<S>, RootError> {
        let mut tags = self.children.iter().filter_map(|child| match child {
            Element::Tag(tag) => Some(tag),
            _ => None,
        });
        let first = tags.next().ok_or(RootError::NoRootTag)?;
        let rest: Vec<&Tag<S>> = tags.collect();
        if rest.is_empty() {
            Ok(first)
        } else {
            let mut names = vec![first.name().to_string()];
            names.extend(rest.iter().map(|tag| tag.name().to_string()));
            Err(RootError::MultipleRootTags(names))
        }
    }

    /// Visit every leaf span of the document, in document order.
    pub fn for_each_span(&self, f: &mut impl FnMut(&S)) {
        for child in &self.children {
            child.for_each_span(f);
        }
    }

    /// Append the exact original input to `out`.
    pub fn write_raw(&self, out: &mut String) {
        self.for_each_span(&mut |span| out.push_str(span.raw()));
    }

    /// The exact original input.
    pub fn raw_xml(&self) -> String {
        let mut out = String::new();
        self.write_raw(&mut out);
        out
    }

    /// Every recovery artifact in the document, in document order.
    pub fn invalid_tags(&self) -> Vec<&Element<S>> {
        let mut found = Vec::new();
        collect_filtered(&self.children, &mut found, &|e| e.is_invalid_tag());
        found
    }

    /// Every `Text` leaf in the document, in document order.
    pub fn text_fragments(&self) -> Vec<&Spanned<S, String>> {
        let mut found = Vec::new();
        collect_filtered(&self.children, &mut found, &|e| {
            matches!(e, Element::Text(_))
        });
        found
            .into_iter()
            .filter_map(|element| match element {
                Element::Text(spanned) => Some(spanned),
                _ => None,
            })
            .collect()
    }
}

fn collect_filtered<'t, S>(
    children: &'t [Element<S>],
    out: &mut Vec<&'t Element<S>>,
    keep: &dyn Fn(&Element<S>) -> bool,
) {
    for child in children {
        if keep(child) {
            out.push(child);
        }
        if let Element::Tag(tag) = child {
            collect_filtered(&tag.children, out, keep);
        }
    }
}
