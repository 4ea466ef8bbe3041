//! Error types for unexam library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for unexam operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while slicing an exam booklet.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input PDF does not exist.
    #[error("Input PDF not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The PDFium library could not be bound or reported a failure.
    #[error("PDFium error: {0}")]
    Pdfium(String),

    /// A page could not be rasterized.
    #[error("Failed to render page {page}: {reason}")]
    PageRender { page: usize, reason: String },

    /// The text layer of a page could not be read.
    #[error("Text extraction error on page {page}: {reason}")]
    TextExtract { page: usize, reason: String },

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// Error encoding or decoding an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Error serializing or deserializing exam data.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No parser is registered under the requested name.
    #[error("Unknown parser: {0}")]
    UnknownParser(String),

    /// No exam data has been persisted yet.
    #[error("Exam data not found: {}", .0.display())]
    ExamDataNotFound(PathBuf),

    /// A processing job failed or its worker went away.
    #[error("Job error: {0}")]
    Job(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<pdfium_render::prelude::PdfiumError> for Error {
    fn from(err: pdfium_render::prelude::PdfiumError) -> Self {
        Error::Pdfium(format!("{:?}", err))
    }
}
