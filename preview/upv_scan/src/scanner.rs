//! Hand-written escape-run scanner.
//!
//! Finds maximal runs of back-to-back escapes and splits them into
//! grammar-tagged tokens. The scanner jumps between backslashes with
//! `memchr` (SIMD-accelerated) and matches each grammar with a focused
//! function, so no regex engine is involved.
//!
//! # Anchor rule
//!
//! A run may only start where the number of consecutive backslashes
//! immediately preceding it is even: `\\uFFFF` is an escaped backslash
//! followed by the literal text `uFFFF`, not a Unicode escape. Regex
//! engines express this with variable-length lookbehind; here it falls
//! out of consuming escaped-backslash pairs before attempting a match.

use crate::span::Span;
use crate::token::{Grammar, Token};

/// Maximal substring of consecutive recognized escapes with no
/// intervening characters.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct EscapeRun {
    pub span: Span,
}

impl EscapeRun {
    /// The run's source text.
    #[inline]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.slice(source)
    }
}

/// Scan the full document for escape runs.
///
/// Returns ordered, non-overlapping runs in document order. Each run is
/// maximal: it greedily consumes one-or-more consecutive escapes of any
/// mix of the four grammars with zero separating characters.
pub fn find_runs(text: &str) -> Vec<EscapeRun> {
    let bytes = text.as_bytes();
    let mut runs = Vec::new();
    let mut pos = 0usize;

    while let Some(off) = memchr::memchr(b'\\', &bytes[pos..]) {
        // Invariant: this is the first backslash of its cluster — the
        // byte before it (if any) is not a backslash, because scanning
        // always resumes past every examined backslash.
        let mut at = pos + off;

        // Consume escaped-backslash pairs; a run may only start after an
        // even number of literal backslashes.
        while at + 1 < bytes.len() && bytes[at] == b'\\' && bytes[at + 1] == b'\\' {
            at += 2;
        }

        if bytes.get(at) != Some(&b'\\') {
            // Even cluster — whatever follows is literal text.
            pos = at;
            continue;
        }

        match match_escape(bytes, at) {
            Some(first) => {
                let start = first.span.start;
                let mut end = first.span.end;
                while let Some(next) = match_escape(bytes, end as usize) {
                    end = next.span.end;
                }
                runs.push(EscapeRun {
                    span: Span::new(start, end),
                });
                pos = end as usize;
            }
            None => pos = at + 1,
        }
    }

    runs
}

/// Split an isolated run into its individual escape tokens.
///
/// Matches the same four grammars as [`find_runs`], this time without the
/// backslash anchor — the run is already known to start on a valid escape.
pub fn split_run(source: &str, run: &EscapeRun) -> Vec<Token> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = run.span.start as usize;

    while pos < run.span.end as usize {
        match match_escape(bytes, pos) {
            Some(token) => {
                pos = token.span.end as usize;
                tokens.push(token);
            }
            // Runs from find_runs tile exactly into tokens; a mismatch
            // means the caller passed a span that is not a run.
            None => break,
        }
    }

    tokens
}

/// Try to match one escape starting at `at` (a backslash).
fn match_escape(bytes: &[u8], at: usize) -> Option<Token> {
    if bytes.get(at) != Some(&b'\\') {
        return None;
    }
    match *bytes.get(at + 1)? {
        b'u' => match_unicode(bytes, at),
        b'x' => match_hex(bytes, at),
        b'0'..=b'7' => match_octal(bytes, at),
        _ => None,
    }
}

/// `\u{H+}` (1+ hex digits, braces required) or `\uHHHH` (exactly 4).
fn match_unicode(bytes: &[u8], at: usize) -> Option<Token> {
    if bytes.get(at + 2) == Some(&b'{') {
        let digits = at + 3;
        let mut i = digits;
        while bytes.get(i).is_some_and(u8::is_ascii_hexdigit) {
            i += 1;
        }
        if i > digits && bytes.get(i) == Some(&b'}') {
            return Some(token(Grammar::CodePoint, at, i + 1, digits, i));
        }
        return None;
    }

    let end = at + 6;
    if end <= bytes.len() && bytes[at + 2..end].iter().all(u8::is_ascii_hexdigit) {
        return Some(token(Grammar::UnicodeUnit, at, end, at + 2, end));
    }
    None
}

/// `\xHH` — exactly 2 hex digits, and not followed by a third one.
///
/// `\x301` looks like a 3-digit hex escape; rather than decorating the
/// misleading `\x30` prefix, the whole thing is left undecorated.
fn match_hex(bytes: &[u8], at: usize) -> Option<Token> {
    let end = at + 4;
    if end <= bytes.len()
        && bytes[at + 2..end].iter().all(u8::is_ascii_hexdigit)
        && !bytes.get(end).is_some_and(u8::is_ascii_hexdigit)
    {
        return Some(token(Grammar::Hex, at, end, at + 2, end));
    }
    None
}

/// `\NNN` — 1 to 3 octal digits with a first-digit-dependent length so
/// the value never exceeds 0o377: `[0-2][0-7]{0,2}`, `3[0-6][0-7]?`,
/// `37[0-7]?`, `[4-7][0-7]?`.
///
/// Notable consequences: a lone `\3` matches nothing, `\378` matches
/// `\37`, and `\0377` matches `\037` leaving the final `7` literal.
fn match_octal(bytes: &[u8], at: usize) -> Option<Token> {
    let is_octal =
        |i: usize| -> bool { bytes.get(i).is_some_and(|b| (b'0'..=b'7').contains(b)) };

    let mut end = at + 2;
    match bytes[at + 1] {
        b'0'..=b'2' => {
            if is_octal(end) {
                end += 1;
                if is_octal(end) {
                    end += 1;
                }
            }
        }
        b'3' => {
            // A second digit is required; `\3` alone is not an escape.
            if !is_octal(end) {
                return None;
            }
            end += 1;
            if is_octal(end) {
                end += 1;
            }
        }
        b'4'..=b'7' => {
            if is_octal(end) {
                end += 1;
            }
        }
        _ => return None,
    }

    Some(token(Grammar::Octal, at, end, at + 1, end))
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "source offsets bounded by u32 — entire document < u32::MAX bytes"
)]
fn token(grammar: Grammar, start: usize, end: usize, digits_start: usize, digits_end: usize) -> Token {
    Token {
        grammar,
        span: Span::new(start as u32, end as u32),
        digits: Span::new(digits_start as u32, digits_end as u32),
    }
}
