//! Property-based tests for the round-trip and liveness guarantees.
//!
//! The parser promises to terminate on *any* finite input and to render the
//! parsed tree back to the exact input bytes. These properties are checked
//! both on arbitrary unicode strings and on generated XML-ish soup biased
//! toward the scanner's fallback paths (truncated constructs, stray
//! brackets, broken entities).

use laxml_core::{parse, parse_text_only, Element, TextSpan};
use proptest::prelude::*;

const FRAGMENTS: &[&str] = &[
    "<a>",
    "</a>",
    "<b x=1 y=2.5>",
    "<c/>",
    "<d k=\"v\">",
    "</d >",
    "some text ",
    "<!-- note -->",
    "<!--",
    "<![CDATA[x]]y]]>",
    "<![CDATA[",
    "&amp;",
    "&#x1F600;",
    "&broken",
    "&",
    "<",
    "</>",
    "<?pi a='b'?>",
    "]]>",
];

fn xmlish_soup() -> impl Strategy<Value = String> {
    let fragment = prop_oneof![
        4 => proptest::sample::select(FRAGMENTS).prop_map(str::to_string),
        1 => "[a-z<>&;\"'=./ ]{0,10}",
    ];
    proptest::collection::vec(fragment, 0..24).prop_map(|parts| parts.concat())
}

fn no_adjacent_text(children: &[Element<TextSpan<'_>>]) -> bool {
    let adjacent = children
        .windows(2)
        .any(|pair| matches!(pair[0], Element::Text(_)) && matches!(pair[1], Element::Text(_)));
    !adjacent
        && children.iter().all(|child| match child {
            Element::Tag(tag) => no_adjacent_text(&tag.children),
            _ => true,
        })
}

fn flattened_text(doc: &laxml_core::Document<TextSpan<'_>>) -> String {
    doc.text_fragments()
        .iter()
        .map(|fragment| fragment.value.as_str())
        .collect()
}

proptest! {
    #[test]
    fn roundtrip_arbitrary_strings(input in ".*") {
        let doc = parse(&input);
        prop_assert_eq!(doc.raw_xml(), input.clone());

        let doc = parse_text_only(&input);
        prop_assert_eq!(doc.raw_xml(), input);
    }

    #[test]
    fn roundtrip_xmlish_soup(input in xmlish_soup()) {
        let doc = parse(&input);
        prop_assert_eq!(doc.raw_xml(), input);
    }

    #[test]
    fn no_adjacent_text_siblings(input in xmlish_soup()) {
        let doc = parse_text_only(&input);
        prop_assert!(no_adjacent_text(&doc.children));
    }

    #[test]
    fn reparse_is_stable(input in xmlish_soup()) {
        let doc = parse_text_only(&input);
        let rendered = doc.raw_xml();

        let reparsed = parse_text_only(&rendered);
        prop_assert_eq!(reparsed.raw_xml(), rendered.clone());
        prop_assert_eq!(flattened_text(&reparsed), flattened_text(&doc));
    }
}
