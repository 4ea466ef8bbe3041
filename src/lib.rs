//! # unexam
//!
//! Slices PDF exam booklets into per-question records and images.
//!
//! Each question of a booklet is located on the PDF text layer, its metadata
//! (type, marks, negative marks, correct answer) is read from its lines, and
//! its area is cropped out of the rendered pages. A question that runs over
//! a page break is stitched into one image.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unexam::{process_file, ExamConfig};
//!
//! fn main() -> unexam::Result<()> {
//!     let config = ExamConfig::new("mock_test.pdf")
//!         .with_image_dir("output_images")
//!         .with_data_dir("data");
//!
//!     let exam = process_file(&config)?;
//!     for question in &exam.questions {
//!         println!("{} {} {}", question.id, question.question_type, question.image_path);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Multi-page questions**: crops from consecutive pages are stitched vertically
//! - **Pluggable layouts**: parsers are looked up by name in a [`ParserRegistry`]
//! - **Swappable PDF access**: PDFium in production, in-memory pages for tests
//! - **Job queue**: uploads are processed one at a time on a worker thread
//! - **Async**: `process_file_async` with the `async` feature

pub mod backend;
pub mod config;
pub mod detect;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;
pub mod render;
pub mod worker;

// Re-export commonly used types
pub use backend::{MemoryBackend, MemoryPage, PdfBackend, PdfiumBackend};
pub use config::ExamConfig;
pub use detect::{detect_format_from_bytes, ensure_pdf, PdfFormat};
pub use error::{Error, Result};
pub use model::{
    CropRegion, ExamDocument, ExamOutput, Line, PageSize, Question, QuestionImage,
    QuestionMetadata, QuestionRange, QuestionType, Word,
};
pub use output::{OutputStore, DEFAULT_BASE_URL};
pub use parser::{ExamParser, GateStandardParser, ParserRegistry};
pub use render::JsonFormat;
pub use worker::{JobHandle, JobOutcome, JobQueue, JobReport};

/// Name of the parser used when none is requested.
pub const DEFAULT_PARSER: &str = "gate_standard";

/// Process a booklet with the default parser and persist the results.
///
/// Writes `q_<id>.png` files into `config.image_dir` and `exam_data.json`
/// into `config.data_dir`, and returns the document as persisted. Nothing
/// is written if the PDF cannot be opened or rendered.
///
/// # Example
///
/// ```no_run
/// use unexam::{process_file, ExamConfig};
///
/// let exam = process_file(&ExamConfig::new("mock_test.pdf")).unwrap();
/// println!("{} questions", exam.question_count());
/// ```
pub fn process_file(config: &ExamConfig) -> Result<ExamDocument> {
    process_file_with_parser(config, DEFAULT_PARSER)
}

/// Process a booklet with a named parser and persist the results.
pub fn process_file_with_parser(config: &ExamConfig, parser: &str) -> Result<ExamDocument> {
    let parser = ParserRegistry::with_defaults().get(parser)?;
    let format = ensure_pdf(&config.input)?;
    log::debug!("{}: {}", config.input.display(), format);

    let pdfium = backend::bind_pdfium()?;
    let backend = PdfiumBackend::open(&pdfium, &config.input)?;
    let output = parser.parse(&backend, config)?;

    OutputStore::new(config).persist(output)
}

/// Parse pages from any backend with the default parser, without touching
/// the filesystem.
///
/// # Example
///
/// ```
/// use unexam::{parse_with_backend, ExamConfig, MemoryBackend, MemoryPage, PageSize};
///
/// let backend = MemoryBackend::new().with_page(
///     MemoryPage::blank(PageSize::a4(), 1.0)
///         .with_line("Q #1 Multiple Choice Type", 100.0, 112.0)
///         .with_line("Award: 2 Penalty: 0.66", 120.0, 132.0),
/// );
/// let output = parse_with_backend(&backend, &ExamConfig::new("mock.pdf")).unwrap();
/// assert_eq!(output.document.question_count(), 1);
/// ```
pub fn parse_with_backend(backend: &dyn PdfBackend, config: &ExamConfig) -> Result<ExamOutput> {
    GateStandardParser::new().parse(backend, config)
}

/// Async variant of [`process_file`] that runs on a blocking thread.
#[cfg(feature = "async")]
pub async fn process_file_async(config: ExamConfig) -> Result<ExamDocument> {
    tokio::task::spawn_blocking(move || process_file(&config))
        .await
        .map_err(|e| Error::Job(format!("processing task failed: {}", e)))?
}

/// Builder for a processing run.
///
/// # Example
///
/// ```no_run
/// use unexam::Unexam;
///
/// let exam = Unexam::new()
///     .with_parser("gate_standard")
///     .with_image_dir("./public/questions")
///     .with_data_dir("./public")
///     .process("mock_test.pdf")?;
/// # Ok::<(), unexam::Error>(())
/// ```
pub struct Unexam {
    config: ExamConfig,
    parser: String,
}

impl Unexam {
    /// Create a new builder with the default directories and parser.
    pub fn new() -> Self {
        Self {
            config: ExamConfig::default(),
            parser: DEFAULT_PARSER.to_string(),
        }
    }

    /// Set the parser name.
    pub fn with_parser(mut self, name: impl Into<String>) -> Self {
        self.parser = name.into();
        self
    }

    /// Set the image output directory.
    pub fn with_image_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.config = self.config.with_image_dir(dir);
        self
    }

    /// Set the data output directory.
    pub fn with_data_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.config = self.config.with_data_dir(dir);
        self
    }

    /// Config that a run on `input` would use.
    pub fn config_for(&self, input: impl Into<std::path::PathBuf>) -> ExamConfig {
        self.config.clone().with_input(input)
    }

    /// Process `input` and persist the results.
    pub fn process(&self, input: impl Into<std::path::PathBuf>) -> Result<ExamDocument> {
        process_file_with_parser(&self.config_for(input), &self.parser)
    }
}

impl Default for Unexam {
    fn default() -> Self {
        Self::new()
    }
}
