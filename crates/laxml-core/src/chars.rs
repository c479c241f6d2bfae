//! XML character classifiers.
//!
//! Pure predicates over a single code point, implementing the XML 1.0
//! productions. XML 1.1 extended name characters are not covered.

/// XML whitespace: space, tab, CR, LF. Deliberately narrower than
/// `char::is_whitespace`.
#[inline]
pub fn is_xml_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

#[inline]
pub fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

/// NameStartChar ::= ":" | [A-Z] | "_" | [a-z] | [#xC0-#xD6] | [#xD8-#xF6]
///                 | [#xF8-#x2FF] | [#x370-#x37D] | [#x37F-#x1FFF]
///                 | [#x200C-#x200D] | [#x2070-#x218F] | [#x2C00-#x2FEF]
///                 | [#x3001-#xD7FF] | [#xF900-#xFDCF] | [#xFDF0-#xFFFD]
///                 | [#x10000-#xEFFFF]
pub fn is_name_start_char(c: char) -> bool {
    matches!(c as u32,
        0x3A // ':'
        | 0x41..=0x5A // 'A'..'Z'
        | 0x5F // '_'
        | 0x61..=0x7A // 'a'..'z'
        | 0xC0..=0xD6
        | 0xD8..=0xF6
        | 0xF8..=0x2FF
        | 0x370..=0x37D
        | 0x37F..=0x1FFF
        | 0x200C..=0x200D
        | 0x2070..=0x218F
        | 0x2C00..=0x2FEF
        | 0x3001..=0xD7FF
        | 0xF900..=0xFDCF
        | 0xFDF0..=0xFFFD
        | 0x10000..=0xEFFFF)
}

/// NameChar ::= NameStartChar | "-" | "." | [0-9] | #xB7 | [#x0300-#x036F]
///            | [#x203F-#x2040]
pub fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c as u32,
            0x2D // '-'
            | 0x2E // '.'
            | 0x30..=0x39 // '0'..'9'
            | 0xB7
            | 0x0300..=0x036F
            | 0x203F..=0x2040)
}
