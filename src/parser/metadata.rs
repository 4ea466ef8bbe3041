//! Reading question type, marks and answer key from question text.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{Line, QuestionMetadata, QuestionType};

const CORRECT_ANSWER: &str = "Correct Answer:";
const NOT_ATTEMPTED: &str = "Not Attempted";
const TIME_TAKEN: &str = "Time taken";

struct Patterns {
    award: Regex,
    penalty: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        award: Regex::new(r"Award:\s*([\d.]+)").expect("valid award regex"),
        penalty: Regex::new(r"Penalty:\s*([\d.]+)").expect("valid penalty regex"),
    })
}

/// Extract metadata from the lines of one question.
///
/// Every line is inspected in order and each field takes the value of the
/// last line that sets it. Fields no line sets keep their defaults.
pub fn extract_metadata(lines: &[Line]) -> QuestionMetadata {
    let mut meta = QuestionMetadata::default();

    for line in lines {
        let text = line.text.as_str();

        if let Some(question_type) = question_type(text) {
            meta.question_type = question_type;
        }
        if let Some(marks) = number_after(&patterns().award, text) {
            meta.marks = marks;
        }
        if let Some(penalty) = number_after(&patterns().penalty, text) {
            meta.negative_marks = penalty;
        }
        if let Some(answer) = correct_answer(text) {
            meta.correct_answer = answer;
        }
    }

    meta
}

fn question_type(text: &str) -> Option<QuestionType> {
    if text.contains("Multiple Choice Type") {
        Some(QuestionType::Mcq)
    } else if text.contains("Multiple Select Type") {
        Some(QuestionType::Msq)
    } else if text.contains("Numerical Type") {
        Some(QuestionType::Nat)
    } else {
        None
    }
}

/// The first number captured by `pattern`; unparsable captures such as
/// `1.2.3` yield `None`.
fn number_after(pattern: &Regex, text: &str) -> Option<f64> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// The answer key on a `Correct Answer:` line, without the
/// attempt/timing columns printed after it.
pub fn correct_answer(text: &str) -> Option<String> {
    let mut parts = text.split(CORRECT_ANSWER);
    parts.next();
    let raw = parts.next()?;

    let mut answer = raw.trim();
    if let Some(idx) = answer.find(NOT_ATTEMPTED) {
        answer = answer[..idx].trim();
    }
    if let Some(idx) = answer.find(TIME_TAKEN) {
        answer = answer[..idx].trim();
    }
    Some(answer.to_string())
}
