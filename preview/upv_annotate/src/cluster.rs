//! Combining-mark cluster merging.
//!
//! A decoded combining mark or modifier symbol visually attaches to the
//! character before it, so its annotation folds into the predecessor:
//! one range spanning both escapes, display text concatenated.

use unicode_properties::{GeneralCategory, GeneralCategoryGroup, UnicodeGeneralCategory};

use crate::decode::DecodedChar;

/// Final output unit: a half-open byte range plus the text to display.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Annotation {
    pub span: upv_scan::Span,
    pub text: String,
}

/// True when `text` contains a character that visually attaches to a
/// preceding base: any Mark category (Mn, Mc, Me) or Modifier_Symbol.
fn extends_cluster(text: &str) -> bool {
    text.chars().any(|c| {
        c.general_category_group() == GeneralCategoryGroup::Mark
            || c.general_category() == GeneralCategory::ModifierSymbol
    })
}

/// Merge decoded characters into visual clusters, left to right.
///
/// A mark merges into its predecessor only when the two are
/// source-adjacent (`prev.span.end == next.span.start`); decoded
/// characters from different escape runs always have literal text
/// between them, so merging never reaches across runs. A mark with no
/// adjacent predecessor (e.g. text that begins mid-grapheme) stays a
/// standalone annotation.
pub fn merge_clusters(decoded: Vec<DecodedChar>) -> Vec<Annotation> {
    let mut out: Vec<Annotation> = Vec::with_capacity(decoded.len());

    for ch in decoded {
        if let Some(prev) = out.last_mut() {
            if prev.span.end == ch.span.start && extends_cluster(&ch.text) {
                prev.text.push_str(&ch.text);
                prev.span.end = ch.span.end;
                continue;
            }
        }
        out.push(Annotation {
            span: ch.span,
            text: ch.text,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use upv_scan::Span;

    fn decoded(text: &str, start: u32, end: u32) -> DecodedChar {
        DecodedChar {
            text: text.to_string(),
            span: Span::new(start, end),
        }
    }

    #[test]
    fn base_plus_combining_mark_merges() {
        // "e" + U+0301 combining acute accent.
        let merged = merge_clusters(vec![
            decoded("e", 0, 4),
            decoded("\u{301}", 4, 12),
        ]);
        assert_eq!(
            merged,
            vec![Annotation {
                span: Span::new(0, 12),
                text: "e\u{301}".to_string(),
            }]
        );
    }

    #[test]
    fn chained_marks_all_fold_into_the_base() {
        let merged = merge_clusters(vec![
            decoded("e", 0, 4),
            decoded("\u{301}", 4, 12),
            decoded("\u{327}", 12, 20),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "e\u{301}\u{327}");
        assert_eq!(merged[0].span, Span::new(0, 20));
    }

    #[test]
    fn modifier_symbol_merges_too() {
        // U+00B4 ACUTE ACCENT has general category Sk (Modifier_Symbol).
        let merged = merge_clusters(vec![
            decoded("a", 0, 4),
            decoded("\u{B4}", 4, 10),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "a\u{B4}");
    }

    #[test]
    fn ordinary_characters_never_merge() {
        let merged = merge_clusters(vec![decoded("1", 0, 4), decoded("2", 4, 8)]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn leading_mark_stays_standalone() {
        let merged = merge_clusters(vec![
            decoded("\u{301}", 0, 8),
            decoded("x", 8, 12),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].text, "\u{301}");
    }

    #[test]
    fn marks_do_not_merge_across_a_gap() {
        // Literal text sits between the two escapes.
        let merged = merge_clusters(vec![
            decoded("e", 0, 4),
            decoded("\u{301}", 9, 17),
        ]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn empty_input_yields_no_annotations() {
        assert_eq!(merge_clusters(vec![]), vec![]);
    }
}
