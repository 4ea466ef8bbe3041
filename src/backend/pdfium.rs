//! PDFium-backed implementation of [`PdfBackend`].

use std::path::Path;

use image::RgbImage;
use pdfium_render::prelude::*;
use unicode_normalization::UnicodeNormalization;

use super::{reading_order, PdfBackend};
use crate::error::{Error, Result};
use crate::model::{PageSize, Word};

/// Fixed rasterization resolution.
pub const RENDER_DPI: f32 = 200.0;

/// Horizontal gap (points) beyond which a character starts a new word.
const X_TOLERANCE: f32 = 3.0;

/// Vertical drift (points) beyond which a character starts a new word.
const Y_TOLERANCE: f32 = 3.0;

/// Bind the PDFium library.
///
/// Looks for the shared library in the working directory first and falls
/// back to the system library paths.
pub fn bind_pdfium() -> Result<Pdfium> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| Error::Pdfium(format!("Failed to load PDFium library: {:?}", e)))?;
    Ok(Pdfium::new(bindings))
}

/// Concrete [`PdfBackend`] backed by a PDFium document.
pub struct PdfiumBackend<'a> {
    document: PdfDocument<'a>,
}

impl<'a> PdfiumBackend<'a> {
    /// Open a PDF file.
    pub fn open(pdfium: &'a Pdfium, path: &Path) -> Result<Self> {
        let document = pdfium.load_pdf_from_file(path, None)?;
        log::debug!(
            "Opened {} ({} pages)",
            path.display(),
            document.pages().len()
        );
        Ok(Self { document })
    }

    fn page(&self, page: usize) -> Result<PdfPage<'_>> {
        let count = self.page_count();
        let index = PdfPageIndex::try_from(page).map_err(|_| Error::PageOutOfRange(page, count))?;
        if page >= count {
            return Err(Error::PageOutOfRange(page, count));
        }
        Ok(self.document.pages().get(index)?)
    }
}

impl PdfBackend for PdfiumBackend<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_size(&self, page: usize) -> Result<PageSize> {
        let p = self.page(page)?;
        Ok(PageSize::new(p.width().value, p.height().value))
    }

    fn page_words(&self, page: usize) -> Result<Vec<Word>> {
        let p = self.page(page)?;
        let page_height = p.height().value;
        let text = p.text().map_err(|e| Error::TextExtract {
            page,
            reason: format!("{:?}", e),
        })?;

        let mut chars = Vec::new();
        for ch in text.chars().iter() {
            let Some(c) = ch.unicode_char() else {
                continue;
            };
            if c.is_control() {
                continue;
            }
            let Ok(bounds) = ch.loose_bounds() else {
                continue;
            };
            chars.push(CharBox::from_pdf_space(
                c,
                bounds.left().value,
                bounds.bottom().value,
                bounds.right().value,
                bounds.top().value,
                page_height,
            ));
        }

        Ok(reading_order(assemble_words(&chars), Y_TOLERANCE))
    }

    fn render_page(&self, page: usize) -> Result<RgbImage> {
        let p = self.page(page)?;
        let scale = RENDER_DPI / 72.0;
        let width = (p.width().value * scale).round() as i32;
        let height = (p.height().value * scale).round() as i32;

        let bitmap = p
            .render_with_config(
                &PdfRenderConfig::new()
                    .set_target_width(width)
                    .set_target_height(height)
                    .render_form_data(true)
                    .render_annotations(true),
            )
            .map_err(|e| Error::PageRender {
                page,
                reason: format!("{:?}", e),
            })?;

        Ok(bitmap.as_image().to_rgb8())
    }
}

/// A character with its box in top-left page coordinates.
#[derive(Debug, Clone, Copy)]
struct CharBox {
    ch: char,
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
}

impl CharBox {
    /// Convert a box in PDF space (origin bottom-left, y up) to top-left
    /// page coordinates.
    fn from_pdf_space(ch: char, left: f32, bottom: f32, right: f32, top: f32, page_height: f32) -> Self {
        Self {
            ch,
            left,
            right,
            top: page_height - top,
            bottom: page_height - bottom,
        }
    }
}

/// Group characters into word fragments.
///
/// Blank characters stay inside a fragment; a fragment ends when the next
/// character jumps backwards, leaves a horizontal gap wider than
/// [`X_TOLERANCE`], or drifts vertically by more than [`Y_TOLERANCE`].
fn assemble_words(chars: &[CharBox]) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current: Vec<CharBox> = Vec::new();

    for &c in chars {
        if let Some(prev) = current.last() {
            let breaks = c.left < prev.left - X_TOLERANCE
                || c.left > prev.right + X_TOLERANCE
                || (c.top - prev.top).abs() > Y_TOLERANCE;
            if breaks {
                words.extend(finish_word(&current));
                current.clear();
            }
        }
        current.push(c);
    }
    words.extend(finish_word(&current));

    words
}

fn finish_word(chars: &[CharBox]) -> Option<Word> {
    let raw: String = chars.iter().map(|c| c.ch).collect();
    let text: String = raw.nfkc().collect::<String>().trim().to_string();
    if text.is_empty() {
        return None;
    }

    let left = chars.iter().map(|c| c.left).fold(f32::INFINITY, f32::min);
    let right = chars.iter().map(|c| c.right).fold(f32::NEG_INFINITY, f32::max);
    let top = chars.iter().map(|c| c.top).fold(f32::INFINITY, f32::min);
    let bottom = chars.iter().map(|c| c.bottom).fold(f32::NEG_INFINITY, f32::max);

    Some(Word::new(text, left, top, right, bottom))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(text: &str, left: f32, top: f32) -> Vec<CharBox> {
        text.chars()
            .enumerate()
            .map(|(i, ch)| CharBox {
                ch,
                left: left + i as f32 * 6.0,
                right: left + i as f32 * 6.0 + 6.0,
                top,
                bottom: top + 10.0,
            })
            .collect()
    }

    #[test]
    fn test_pdf_space_flip() {
        // glyph box 742..752 pt above the page bottom
        let c = CharBox::from_pdf_space('Q', 72.0, 742.0, 78.0, 752.0, 842.0);
        assert_eq!((c.left, c.right), (72.0, 78.0));
        assert_eq!(c.top, 90.0);
        assert_eq!(c.bottom, 100.0);
        assert!(c.top < c.bottom);

        let c = CharBox::from_pdf_space('x', 0.0, 0.0, 5.0, 8.0, 842.0);
        assert_eq!((c.top, c.bottom), (834.0, 842.0));
    }

    #[test]
    fn test_assemble_keeps_blank_chars() {
        let words = assemble_words(&chars("Q #12", 72.0, 100.0));
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "Q #12");
        assert_eq!(words[0].left, 72.0);
        assert_eq!(words[0].right, 72.0 + 5.0 * 6.0);
        assert_eq!(words[0].top, 100.0);
        assert_eq!(words[0].bottom, 110.0);
    }

    #[test]
    fn test_assemble_splits_on_gap_and_row() {
        let mut input = chars("Award:", 72.0, 100.0);
        input.extend(chars("2", 200.0, 100.5));
        input.extend(chars("next", 72.0, 130.0));

        let texts: Vec<String> = assemble_words(&input).into_iter().map(|w| w.text).collect();
        assert_eq!(texts, vec!["Award:", "2", "next"]);
    }

    #[test]
    fn test_assemble_drops_blank_fragments() {
        let mut input = chars("A", 72.0, 100.0);
        input.extend(chars("   ", 300.0, 100.0));
        let words = assemble_words(&input);
        assert_eq!(words.len(), 1);
    }

    #[test]
    fn test_assemble_normalizes_ligatures() {
        let words = assemble_words(&chars("\u{FB01}nal", 72.0, 100.0));
        assert_eq!(words[0].text, "final");
    }
}
