//! Exam parsers.
//!
//! An [`ExamParser`] turns the pages of one booklet into an [`ExamOutput`].
//! Each parser handles one booklet layout convention; parsers are looked up
//! by name through a [`ParserRegistry`].
//!
//! # Example
//!
//! ```no_run
//! use unexam::backend::{bind_pdfium, PdfiumBackend};
//! use unexam::parser::ParserRegistry;
//! use unexam::ExamConfig;
//!
//! fn main() -> unexam::Result<()> {
//!     let config = ExamConfig::new("mock.pdf");
//!     let pdfium = bind_pdfium()?;
//!     let backend = PdfiumBackend::open(&pdfium, &config.input)?;
//!
//!     let parser = ParserRegistry::with_defaults().get("gate_standard")?;
//!     let output = parser.parse(&backend, &config)?;
//!     println!("{} questions", output.document.question_count());
//!     Ok(())
//! }
//! ```

mod crop;
mod gate;
mod lines;
mod metadata;
mod segment;

pub use crop::{crop_regions, is_footer, FOOTER_PADDING};
pub use gate::{GateStandardParser, LayoutAnalysis, EXAM_DURATION, EXAM_TITLE};
pub use lines::{group_words_into_lines, LINE_MERGE_TOLERANCE};
pub use metadata::{correct_answer, extract_metadata};
pub use segment::{boundary_marker, is_boundary, segment_questions};

use std::collections::HashMap;
use std::sync::Arc;

use crate::backend::PdfBackend;
use crate::config::ExamConfig;
use crate::error::{Error, Result};
use crate::model::ExamOutput;

/// Trait for exam booklet parsers.
///
/// Implement this trait to support another booklet layout.
pub trait ExamParser: Send + Sync {
    /// Registry name of this parser (lowercase, e.g. `gate_standard`).
    fn name(&self) -> &str;

    /// One-line description for listings.
    fn description(&self) -> &str {
        ""
    }

    /// Parse every page of `backend` into questions and their images.
    ///
    /// `config` supplies the image route recorded in each question; nothing
    /// is written to disk.
    fn parse(&self, backend: &dyn PdfBackend, config: &ExamConfig) -> Result<ExamOutput>;
}

/// Registry of parsers keyed by name.
pub struct ParserRegistry {
    by_name: HashMap<String, Arc<dyn ExamParser>>,
}

impl ParserRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the built-in parsers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(GateStandardParser::new()));
        registry
    }

    /// Register a parser under its name, replacing any previous one.
    pub fn register(&mut self, parser: Arc<dyn ExamParser>) {
        self.by_name.insert(parser.name().to_lowercase(), parser);
    }

    /// Look up a parser by name (case-insensitive).
    pub fn get(&self, name: &str) -> Result<Arc<dyn ExamParser>> {
        self.by_name
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| Error::UnknownParser(name.to_string()))
    }

    /// Whether a parser is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(&name.to_lowercase())
    }

    /// Registered parsers, sorted by name.
    pub fn parsers(&self) -> Vec<Arc<dyn ExamParser>> {
        let mut parsers: Vec<_> = self.by_name.values().cloned().collect();
        parsers.sort_by(|a, b| a.name().cmp(b.name()));
        parsers
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExamDocument;

    struct NullParser;

    impl ExamParser for NullParser {
        fn name(&self) -> &str {
            "Null"
        }

        fn parse(&self, _backend: &dyn PdfBackend, _config: &ExamConfig) -> Result<ExamOutput> {
            Ok(ExamOutput {
                document: ExamDocument::new("empty", 0),
                images: Vec::new(),
            })
        }
    }

    #[test]
    fn test_registry_defaults() {
        let registry = ParserRegistry::with_defaults();
        assert!(registry.contains("gate_standard"));
        assert!(registry.contains("GATE_STANDARD"));
        assert!(registry.get("gate_standard").is_ok());
    }

    #[test]
    fn test_registry_unknown_parser() {
        let registry = ParserRegistry::new();
        assert!(matches!(
            registry.get("gate_standard"),
            Err(Error::UnknownParser(name)) if name == "gate_standard"
        ));
    }

    #[test]
    fn test_registry_register_and_list() {
        let mut registry = ParserRegistry::with_defaults();
        registry.register(Arc::new(NullParser));

        let names: Vec<String> = registry
            .parsers()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["Null", "gate_standard"]);
        assert!(registry.get("null").is_ok());
        assert_eq!(registry.get("null").unwrap().description(), "");
    }
}
