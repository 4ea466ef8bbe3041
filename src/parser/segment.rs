//! Splitting the line stream into questions.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{Line, QuestionRange};

fn boundary_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^Q\s?#(\d+)").expect("valid boundary regex"))
}

/// If `text` opens a question, return the number printed in its marker.
///
/// The outer `Option` says whether the line is a boundary; the inner one is
/// `None` when the digits overflow `u32`.
pub fn boundary_marker(text: &str) -> Option<Option<u32>> {
    boundary_pattern()
        .captures(text)
        .map(|caps| caps.get(1).and_then(|m| m.as_str().parse().ok()))
}

/// Whether `text` opens a question.
pub fn is_boundary(text: &str) -> bool {
    boundary_pattern().is_match(text)
}

/// Partition `lines` into question ranges.
///
/// Lines before the first boundary belong to no range. Each range runs from
/// its boundary up to the line before the next boundary, or to the last line.
pub fn segment_questions(lines: &[Line]) -> Vec<QuestionRange> {
    let mut ranges = Vec::new();
    let mut next_id = 1;
    let mut i = 0;

    while i < lines.len() {
        let Some(marker) = boundary_marker(&lines[i].text) else {
            i += 1;
            continue;
        };

        let start = i;
        let mut end = lines.len() - 1;
        for (j, line) in lines.iter().enumerate().skip(start + 1) {
            if is_boundary(&line.text) {
                end = j - 1;
                break;
            }
        }

        if marker.is_some_and(|n| n != next_id) {
            log::debug!(
                "Question {} carries marker #{}",
                next_id,
                marker.unwrap_or_default()
            );
        }

        ranges.push(QuestionRange {
            id: next_id,
            start,
            end,
            marker,
        });
        next_id += 1;
        i = end + 1;
    }

    ranges
}
