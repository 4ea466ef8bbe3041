//! Exam output types.

use image::RgbImage;
use serde::{Deserialize, Serialize};

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuestionType {
    /// Multiple choice, single answer
    #[default]
    Mcq,
    /// Multiple select
    Msq,
    /// Numerical answer
    Nat,
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QuestionType::Mcq => "MCQ",
            QuestionType::Msq => "MSQ",
            QuestionType::Nat => "NAT",
        };
        f.write_str(name)
    }
}

/// Fields read from a question's text.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionMetadata {
    pub question_type: QuestionType,
    pub marks: f64,
    pub negative_marks: f64,
    pub correct_answer: String,
}

impl Default for QuestionMetadata {
    fn default() -> Self {
        Self {
            question_type: QuestionType::Mcq,
            marks: 1.0,
            negative_marks: 0.0,
            correct_answer: String::new(),
        }
    }
}

/// One extracted question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Sequential id, 1-based
    pub id: u32,

    /// Route of the stitched question image
    pub image_path: String,

    /// Question type
    #[serde(rename = "type")]
    pub question_type: QuestionType,

    /// Marks awarded for a correct answer
    pub marks: f64,

    /// Marks deducted for a wrong answer
    pub negative_marks: f64,

    /// Answer key text, empty when absent
    pub correct_answer: String,
}

impl Question {
    /// Build a question record from its metadata.
    pub fn new(id: u32, image_path: impl Into<String>, metadata: QuestionMetadata) -> Self {
        Self {
            id,
            image_path: image_path.into(),
            question_type: metadata.question_type,
            marks: metadata.marks,
            negative_marks: metadata.negative_marks,
            correct_answer: metadata.correct_answer,
        }
    }
}

/// The persisted exam document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamDocument {
    /// Exam title shown to candidates
    pub exam_title: String,

    /// Duration in minutes
    pub duration: u32,

    /// Questions in discovery order
    pub questions: Vec<Question>,
}

impl ExamDocument {
    /// Create an empty exam.
    pub fn new(exam_title: impl Into<String>, duration: u32) -> Self {
        Self {
            exam_title: exam_title.into(),
            duration,
            questions: Vec::new(),
        }
    }

    /// Number of questions.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Look up a question by id.
    pub fn question(&self, id: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Sum of the marks of all questions.
    pub fn total_marks(&self) -> f64 {
        self.questions.iter().map(|q| q.marks).sum()
    }
}

/// Stitched bitmap of one question.
#[derive(Debug, Clone)]
pub struct QuestionImage {
    /// Id of the question this image belongs to
    pub question_id: u32,
    /// File name inside the image directory
    pub file_name: String,
    /// The stitched bitmap
    pub image: RgbImage,
}

impl QuestionImage {
    /// Name an image after its question id.
    pub fn new(question_id: u32, image: RgbImage) -> Self {
        Self {
            question_id,
            file_name: format!("q_{}.png", question_id),
            image,
        }
    }
}

/// Result of one parse, before anything touches the filesystem.
#[derive(Debug, Clone)]
pub struct ExamOutput {
    pub document: ExamDocument,
    pub images: Vec<QuestionImage>,
}
