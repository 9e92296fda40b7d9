//! Grammar-tagged escape tokens.

use crate::span::Span;

/// The four recognized escape grammars.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Grammar {
    /// `\NNN` — 1 to 3 octal digits, value bounded to `0o377`.
    Octal,
    /// `\xHH` — exactly 2 hex digits.
    Hex,
    /// `\uHHHH` — exactly 4 hex digits, a UTF-16 code unit.
    UnicodeUnit,
    /// `\u{H+}` — 1 or more hex digits, a full Unicode scalar value.
    CodePoint,
}

impl Grammar {
    /// Radix used to parse this grammar's digits.
    #[inline]
    pub const fn base(self) -> u32 {
        match self {
            Grammar::Octal => 8,
            Grammar::Hex | Grammar::UnicodeUnit | Grammar::CodePoint => 16,
        }
    }
}

/// One matched escape occurrence.
///
/// `span` covers the whole escape including the leading backslash;
/// `digits` covers only the digit characters (for `\u{H+}` the part
/// between the braces).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Token {
    pub grammar: Grammar,
    pub span: Span,
    pub digits: Span,
}

impl Token {
    /// The token's digit characters as a string slice.
    #[inline]
    pub fn digits_str<'a>(&self, source: &'a str) -> &'a str {
        self.digits.slice(source)
    }
}
