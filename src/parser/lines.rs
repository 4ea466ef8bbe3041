//! Grouping of word fragments into lines.

use crate::model::{Line, PageSize, Word};

/// Maximum distance between a fragment's top and the open line's reference
/// top for the fragment to join that line.
pub const LINE_MERGE_TOLERANCE: f32 = 5.0;

/// Group one page's fragments into lines.
///
/// Fragments are consumed in the order given, which is expected to be
/// reading order. A fragment joins the open line while its top stays within
/// [`LINE_MERGE_TOLERANCE`] of the top of the line's first fragment; the
/// reference top never moves once the line is opened.
pub fn group_words_into_lines(words: &[Word], page: usize, size: PageSize) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current: Vec<&Word> = Vec::new();
    let mut reference_top = 0.0;

    for word in words {
        if current.is_empty() {
            reference_top = word.top;
        } else if (word.top - reference_top).abs() >= LINE_MERGE_TOLERANCE {
            lines.push(close_line(&current, page, size));
            current.clear();
            reference_top = word.top;
        }
        current.push(word);
    }

    if !current.is_empty() {
        lines.push(close_line(&current, page, size));
    }

    lines
}

fn close_line(words: &[&Word], page: usize, size: PageSize) -> Line {
    let text = words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    // non-empty: callers only close populated buffers
    let top = words[0].top;
    let bottom = words[words.len() - 1].bottom;
    Line::new(text, top, bottom, page, size)
}
