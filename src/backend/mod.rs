//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for the two things the layout pipeline
//! needs from a PDF library: the positioned words of each page's text layer
//! and a bitmap of each page. This isolates the concrete library (PDFium)
//! from the question slicing logic.

mod memory;
mod pdfium;

pub use memory::{MemoryBackend, MemoryPage};
pub use pdfium::{bind_pdfium, PdfiumBackend, RENDER_DPI};

use image::RgbImage;

use crate::error::Result;
use crate::model::{PageSize, Word};

/// Abstract interface for PDF page access.
///
/// Pages are addressed by zero-based index. Word coordinates use the
/// top-left page origin; bitmaps cover the whole page.
pub trait PdfBackend {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Coordinate-space size of a page.
    fn page_size(&self, page: usize) -> Result<PageSize>;

    /// Word fragments of a page in reading order
    /// (top-to-bottom, then left-to-right).
    fn page_words(&self, page: usize) -> Result<Vec<Word>>;

    /// Rasterize a page at the backend's fixed resolution.
    fn render_page(&self, page: usize) -> Result<RgbImage>;
}

/// Sort fragments into reading order.
///
/// Fragments are ordered by top, grouped into rows whose tops lie within
/// `tolerance` of the row's first fragment, and ordered left-to-right inside
/// each row.
pub fn reading_order(mut words: Vec<Word>, tolerance: f32) -> Vec<Word> {
    words.sort_by(|a, b| a.top.total_cmp(&b.top));

    let mut ordered = Vec::with_capacity(words.len());
    let mut row: Vec<Word> = Vec::new();
    let mut row_top = 0.0;

    for word in words {
        if !row.is_empty() && (word.top - row_top).abs() > tolerance {
            row.sort_by(|a, b| a.left.total_cmp(&b.left));
            ordered.append(&mut row);
        }
        if row.is_empty() {
            row_top = word.top;
        }
        row.push(word);
    }
    row.sort_by(|a, b| a.left.total_cmp(&b.left));
    ordered.append(&mut row);

    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_order_rows_then_columns() {
        let words = vec![
            Word::new("world", 60.0, 101.5, 90.0, 110.0),
            Word::new("second", 10.0, 130.0, 50.0, 140.0),
            Word::new("hello", 10.0, 100.0, 50.0, 110.0),
        ];

        let ordered: Vec<String> = reading_order(words, 3.0)
            .into_iter()
            .map(|w| w.text)
            .collect();
        assert_eq!(ordered, vec!["hello", "world", "second"]);
    }

    #[test]
    fn test_reading_order_empty() {
        assert!(reading_order(Vec::new(), 3.0).is_empty());
    }
}
