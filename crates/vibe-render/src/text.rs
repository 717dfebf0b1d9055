#![forbid(unsafe_code)]

//! Width-aware text helpers.
//!
//! All widths are terminal columns as reported by `unicode-width`, and all
//! cuts happen on extended grapheme cluster boundaries.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width of `s` in terminal columns.
#[inline]
#[must_use]
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Longest prefix of `s` that fits in `max_width` columns.
#[must_use]
pub fn truncate_to_width(s: &str, max_width: usize) -> &str {
    let mut used = 0;
    for (idx, g) in s.grapheme_indices(true) {
        let w = display_width(g);
        if used + w > max_width {
            return &s[..idx];
        }
        used += w;
    }
    s
}

/// Like [`truncate_to_width`], but marks a cut with a trailing `…`.
#[must_use]
pub fn truncate_with_ellipsis(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = truncate_to_width(s, max_width - 1).to_string();
    out.push('…');
    out
}

/// Word-wrap `text` to `width` columns.
///
/// Explicit newlines are kept as line breaks. Words longer than `width` are
/// split at grapheme boundaries. Trailing spaces are dropped from each line.
#[must_use]
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let raw = raw.trim_end_matches('\r');
        if raw.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut line = String::new();
        let mut line_width = 0;
        let mut continued = false;
        for word in raw.split_word_bounds() {
            let w = display_width(word);
            let is_space = word.chars().all(char::is_whitespace);
            if is_space && line.is_empty() && continued {
                continue;
            }
            if line_width + w <= width {
                line.push_str(word);
                line_width += w;
                continue;
            }
            if is_space || !line.is_empty() {
                lines.push(std::mem::take(&mut line).trim_end().to_string());
                line_width = 0;
                continued = true;
                if is_space {
                    continue;
                }
            }
            for g in word.graphemes(true) {
                let gw = display_width(g);
                if line_width + gw > width && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                    continued = true;
                }
                line.push_str(g);
                line_width += gw;
            }
        }
        lines.push(line.trim_end().to_string());
    }
    lines
}

/// The first `max_chars` characters of `s`, followed by `...` when cut.
#[must_use]
pub fn preview(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
