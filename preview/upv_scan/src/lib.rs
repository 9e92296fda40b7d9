//! Escape-run tokenizer for unicode-preview.
//!
//! Scans arbitrary source text for maximal runs of back-to-back Unicode
//! escape sequences in four grammars (`\NNN` octal, `\xHH`, `\uHHHH`,
//! `\u{H+}`) and splits each run into grammar-tagged tokens with byte
//! spans. Decoding the tokens to display text lives in `upv_annotate`;
//! this crate only recognizes and delimits.

mod scanner;
mod span;
mod token;

pub use scanner::{find_runs, split_run, EscapeRun};
pub use span::Span;
pub use token::{Grammar, Token};
