//! Token decoding and UTF-16 surrogate pairing.
//!
//! Octal, hex, and code-point tokens decode independently. Consecutive
//! `\uHHHH` tokens are considered together so a high/low surrogate pair
//! combines into the single character it encodes. Tokens that do not
//! decode to a valid scalar value are dropped silently — one bad token
//! never aborts its siblings (no-throw guarantee).

use upv_scan::{Grammar, Token};

/// One or more source tokens decoded to display text.
///
/// The span covers every source byte that contributed: one token for
/// octal/hex/code-point, two tokens for a surrogate pair.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodedChar {
    pub text: String,
    pub span: upv_scan::Span,
}

const HIGH_SURROGATES: std::ops::RangeInclusive<u16> = 0xD800..=0xDBFF;
const LOW_SURROGATES: std::ops::RangeInclusive<u16> = 0xDC00..=0xDFFF;

/// Decode one run's tokens, in document order.
pub fn decode_run(source: &str, tokens: &[Token]) -> Vec<DecodedChar> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        if tokens[i].grammar == Grammar::UnicodeUnit {
            let start = i;
            while i < tokens.len() && tokens[i].grammar == Grammar::UnicodeUnit {
                i += 1;
            }
            decode_units(source, &tokens[start..i], &mut out);
        } else {
            if let Some(decoded) = decode_single(source, &tokens[i]) {
                out.push(decoded);
            }
            i += 1;
        }
    }

    out
}

/// Decode an independent octal, hex, or code-point token.
///
/// Returns `None` when the digits fail to parse (overflow) or the value
/// is not a Unicode scalar value (e.g. `\u{110000}`, `\u{D800}`).
fn decode_single(source: &str, token: &Token) -> Option<DecodedChar> {
    let value = u32::from_str_radix(token.digits_str(source), token.grammar.base()).ok()?;
    let ch = char::from_u32(value)?;
    Some(DecodedChar {
        text: ch.to_string(),
        span: token.span,
    })
}

/// Decode a maximal sub-sequence of consecutive `\uHHHH` tokens.
///
/// Left to right: a high surrogate pairs with an immediately following
/// low surrogate into one character spanning both tokens; any other unit
/// decodes alone spanning just its own token.
fn decode_units(source: &str, tokens: &[Token], out: &mut Vec<DecodedChar>) {
    let mut i = 0;

    while i < tokens.len() {
        let Some(unit) = parse_unit(source, &tokens[i]) else {
            // Unreachable for 4-hex-digit tokens; defensive drop.
            i += 1;
            continue;
        };

        if HIGH_SURROGATES.contains(&unit) {
            if let Some(low) = tokens.get(i + 1).and_then(|t| parse_unit(source, t)) {
                if LOW_SURROGATES.contains(&low) {
                    out.push(DecodedChar {
                        text: combine_surrogates(unit, low).to_string(),
                        span: tokens[i].span.merge(tokens[i + 1].span),
                    });
                    i += 2;
                    continue;
                }
            }
        }

        out.push(DecodedChar {
            text: decode_lone_unit(unit),
            span: tokens[i].span,
        });
        i += 1;
    }
}

fn parse_unit(source: &str, token: &Token) -> Option<u16> {
    u16::from_str_radix(token.digits_str(source), 16).ok()
}

/// Combine a valid surrogate pair into its scalar value.
fn combine_surrogates(high: u16, low: u16) -> char {
    let scalar =
        0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
    // Pair arithmetic lands in 0x10000..=0x10FFFF, always a valid scalar.
    char::from_u32(scalar).unwrap_or('\u{FFFD}')
}

/// A lone code unit decodes to its scalar value. An unpaired surrogate
/// has no scalar value in Rust; it renders as U+FFFD so the escape is
/// visibly annotated rather than silently dropped.
fn decode_lone_unit(unit: u16) -> String {
    char::from_u32(u32::from(unit)).unwrap_or('\u{FFFD}').to_string()
}
