//! Data model shared by the layout pipeline and its outputs.
//!
//! Geometry types ([`Word`], [`Line`], [`CropRegion`]) live in page
//! coordinate space: PDF points with the origin at the top-left corner of the
//! page and y growing downward. Only the compositor converts them to pixels.

mod exam;
mod layout;
mod region;

pub use exam::{ExamDocument, ExamOutput, Question, QuestionImage, QuestionMetadata, QuestionType};
pub use layout::{Line, PageSize, Word};
pub use region::{CropRegion, QuestionRange};
