//! Byte offset to LSP position mapping and back.
//!
//! Annotation spans are byte offsets into the document text; LSP
//! positions count lines and UTF-16 code units within the line. Both
//! directions clamp: out-of-range input clamps to the document end and
//! an offset inside a multi-byte character clamps down to the previous
//! boundary. Cached spans can briefly point into freshly edited text
//! while a rescan is debounced, so a stale request must degrade to a
//! harmless result instead of a panic.

use tower_lsp::lsp_types::Position;

#[allow(
    clippy::cast_possible_truncation,
    reason = "line counts and UTF-16 columns bounded by document size < u32::MAX"
)]
pub fn offset_to_position(text: &str, offset: u32) -> Position {
    let target = (offset as usize).min(text.len());

    // Count only characters that end at or before the target, so an
    // offset splitting a multi-byte character never slices the text.
    let mut line = 0u32;
    let mut character = 0u32;
    for (i, c) in text.char_indices() {
        if i + c.len_utf8() > target {
            break;
        }
        if c == '\n' {
            line += 1;
            character = 0;
        } else {
            character += c.len_utf16() as u32;
        }
    }

    Position::new(line, character)
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "byte offsets bounded by document size < u32::MAX"
)]
pub fn position_to_offset(text: &str, position: Position) -> u32 {
    let mut line_start = 0usize;
    if position.line > 0 {
        let mut line = 0u32;
        let mut found = false;
        for (i, c) in text.char_indices() {
            if c == '\n' {
                line += 1;
                if line == position.line {
                    line_start = i + 1;
                    found = true;
                    break;
                }
            }
        }
        if !found {
            return text.len() as u32;
        }
    }

    let mut units = 0u32;
    for (i, c) in text[line_start..].char_indices() {
        if c == '\n' || units >= position.character {
            return (line_start + i) as u32;
        }
        units += c.len_utf16() as u32;
    }
    text.len() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ascii_single_line() {
        assert_eq!(offset_to_position("abc", 0), Position::new(0, 0));
        assert_eq!(offset_to_position("abc", 2), Position::new(0, 2));
        assert_eq!(position_to_offset("abc", Position::new(0, 2)), 2);
    }

    #[test]
    fn lines_split_on_newline() {
        let text = "ab\ncd\nef";
        assert_eq!(offset_to_position(text, 3), Position::new(1, 0));
        assert_eq!(offset_to_position(text, 7), Position::new(2, 1));
        assert_eq!(position_to_offset(text, Position::new(1, 0)), 3);
        assert_eq!(position_to_offset(text, Position::new(2, 1)), 7);
    }

    #[test]
    fn columns_count_utf16_units() {
        // One astral char (4 bytes, 2 UTF-16 units) before the target.
        let text = "\u{1F600}x";
        assert_eq!(offset_to_position(text, 4), Position::new(0, 2));
        assert_eq!(position_to_offset(text, Position::new(0, 2)), 4);
    }

    #[test]
    fn multibyte_bmp_counts_one_unit() {
        // Two-byte character, one UTF-16 unit.
        let text = "\u{e9}x";
        assert_eq!(offset_to_position(text, 2), Position::new(0, 1));
        assert_eq!(position_to_offset(text, Position::new(0, 1)), 2);
    }

    #[test]
    fn mid_char_offset_clamps_to_previous_boundary() {
        // Two two-byte characters; offsets 1 and 3 split them. A cached
        // span can point mid-char after an edit, before the rescan runs.
        let text = "\u{e9}\u{e9}";
        assert_eq!(offset_to_position(text, 1), Position::new(0, 0));
        assert_eq!(offset_to_position(text, 3), Position::new(0, 1));
        // Mid-astral offset, after a newline.
        let text = "a\n\u{1F600}b";
        assert_eq!(offset_to_position(text, 4), Position::new(1, 0));
        assert_eq!(offset_to_position(text, 6), Position::new(1, 2));
    }

    #[test]
    fn out_of_range_clamps_to_document_end() {
        let text = "ab\ncd";
        assert_eq!(offset_to_position(text, 999), Position::new(1, 2));
        assert_eq!(position_to_offset(text, Position::new(9, 0)), 5);
        assert_eq!(position_to_offset(text, Position::new(1, 99)), 5);
    }

    #[test]
    fn round_trips_on_char_boundaries() {
        let text = "let s = '\u{3C0}';\nnext \u{1F600} line";
        for (i, _) in text.char_indices() {
            let position = offset_to_position(text, i as u32);
            assert_eq!(position_to_offset(text, position), i as u32, "offset {i}");
        }
    }
}
