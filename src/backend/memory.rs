//! In-memory backend for pre-rendered pages.

use image::{Rgb, RgbImage};

use super::PdfBackend;
use crate::error::{Error, Result};
use crate::model::{PageSize, Word};

/// One page held in memory: its size, words and bitmap.
#[derive(Debug, Clone)]
pub struct MemoryPage {
    pub size: PageSize,
    pub words: Vec<Word>,
    pub image: RgbImage,
    /// Simulate a page whose text layer cannot be read
    pub unreadable_text: bool,
}

impl MemoryPage {
    /// A white page rendered at `scale` pixels per point.
    pub fn blank(size: PageSize, scale: f32) -> Self {
        let width = (size.width * scale).round().max(1.0) as u32;
        let height = (size.height * scale).round().max(1.0) as u32;
        Self {
            size,
            words: Vec::new(),
            image: RgbImage::from_pixel(width, height, Rgb([255, 255, 255])),
            unreadable_text: false,
        }
    }

    /// Add a single-word line of text between `top` and `bottom`.
    pub fn with_line(mut self, text: &str, top: f32, bottom: f32) -> Self {
        let right = 72.0 + text.chars().count() as f32 * 5.0;
        self.words.push(Word::new(text, 72.0, top, right, bottom));
        self
    }

    /// Add a word fragment.
    pub fn with_word(mut self, word: Word) -> Self {
        self.words.push(word);
        self
    }

    /// Mark the text layer as unreadable.
    pub fn with_unreadable_text(mut self) -> Self {
        self.unreadable_text = true;
        self
    }
}

/// [`PdfBackend`] over pages that are already in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    pages: Vec<MemoryPage>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page.
    pub fn with_page(mut self, page: MemoryPage) -> Self {
        self.pages.push(page);
        self
    }

    /// Append a page in place.
    pub fn push_page(&mut self, page: MemoryPage) {
        self.pages.push(page);
    }

    fn page(&self, page: usize) -> Result<&MemoryPage> {
        self.pages
            .get(page)
            .ok_or(Error::PageOutOfRange(page, self.pages.len()))
    }
}

impl PdfBackend for MemoryBackend {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_size(&self, page: usize) -> Result<PageSize> {
        Ok(self.page(page)?.size)
    }

    fn page_words(&self, page: usize) -> Result<Vec<Word>> {
        let p = self.page(page)?;
        if p.unreadable_text {
            return Err(Error::TextExtract {
                page,
                reason: "text layer unavailable".to_string(),
            });
        }
        Ok(p.words.clone())
    }

    fn render_page(&self, page: usize) -> Result<RgbImage> {
        Ok(self.page(page)?.image.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_page_dimensions() {
        let page = MemoryPage::blank(PageSize::new(100.0, 200.0), 2.0);
        assert_eq!(page.image.dimensions(), (200, 400));
    }

    #[test]
    fn test_backend_pages() {
        let backend = MemoryBackend::new()
            .with_page(MemoryPage::blank(PageSize::a4(), 1.0).with_line("Q #1", 10.0, 20.0))
            .with_page(MemoryPage::blank(PageSize::a4(), 1.0).with_unreadable_text());

        assert_eq!(backend.page_count(), 2);
        assert_eq!(backend.page_words(0).unwrap().len(), 1);
        assert!(matches!(
            backend.page_words(1),
            Err(Error::TextExtract { page: 1, .. })
        ));
        assert!(matches!(
            backend.render_page(5),
            Err(Error::PageOutOfRange(5, 2))
        ));
    }
}
