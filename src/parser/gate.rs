//! Parser for the standard GATE mock test booklet.
//!
//! Questions open with a `Q #<n>` line and may close with an answer footer
//! (`Correct Answer:` / `Your Answer:`). A question may continue onto the
//! following pages; its image is stitched from one crop per page.

use image::RgbImage;

use super::{crop_regions, extract_metadata, group_words_into_lines, segment_questions, ExamParser};
use crate::backend::PdfBackend;
use crate::config::ExamConfig;
use crate::error::Result;
use crate::model::{
    CropRegion, ExamDocument, ExamOutput, Line, Question, QuestionImage, QuestionRange,
};
use crate::render::compose_question_image;

/// Title recorded for every booklet of this layout.
pub const EXAM_TITLE: &str = "GATE Mock Test";

/// Exam duration in minutes.
pub const EXAM_DURATION: u32 = 180;

/// The text layout of a booklet: its line stream and the questions in it.
#[derive(Debug, Clone, Default)]
pub struct LayoutAnalysis {
    /// Number of pages in the document
    pub page_count: usize,
    /// All lines of all pages, ordered by (page, top)
    pub lines: Vec<Line>,
    /// Question ranges over `lines`
    pub ranges: Vec<QuestionRange>,
}

impl LayoutAnalysis {
    /// Lines of one question.
    pub fn question_lines(&self, range: &QuestionRange) -> &[Line] {
        range.lines(&self.lines)
    }

    /// Crop regions of one question.
    pub fn question_regions(&self, range: &QuestionRange) -> Vec<CropRegion> {
        crop_regions(self.question_lines(range))
    }
}

/// Parser for GATE mock test booklets, with multi-page question support.
#[derive(Debug, Clone, Default)]
pub struct GateStandardParser {
    _private: (),
}

impl GateStandardParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Extract the line stream of every page and segment it into questions.
    ///
    /// A page whose text layer cannot be read contributes no lines.
    pub fn analyze(&self, backend: &dyn PdfBackend) -> Result<LayoutAnalysis> {
        let page_count = backend.page_count();
        let mut lines = Vec::new();

        for page in 0..page_count {
            let size = backend.page_size(page)?;
            match backend.page_words(page) {
                Ok(words) => {
                    let page_lines = group_words_into_lines(&words, page, size);
                    log::debug!(
                        "Page {}: {} words, {} lines",
                        page + 1,
                        words.len(),
                        page_lines.len()
                    );
                    lines.extend(page_lines);
                }
                Err(e) => log::warn!("Skipping text of page {}: {}", page + 1, e),
            }
        }

        let ranges = segment_questions(&lines);
        Ok(LayoutAnalysis {
            page_count,
            lines,
            ranges,
        })
    }

    fn render_pages(&self, backend: &dyn PdfBackend) -> Result<Vec<RgbImage>> {
        (0..backend.page_count())
            .map(|page| {
                log::debug!("Rendering page {}", page + 1);
                backend.render_page(page)
            })
            .collect()
    }
}

impl ExamParser for GateStandardParser {
    fn name(&self) -> &str {
        "gate_standard"
    }

    fn description(&self) -> &str {
        "GATE mock test booklet (Q #<n> markers, answer footers)"
    }

    fn parse(&self, backend: &dyn PdfBackend, config: &ExamConfig) -> Result<ExamOutput> {
        log::info!(
            "Parsing {} with {} ({} pages)",
            config.input.display(),
            self.name(),
            backend.page_count()
        );

        // every page is needed up front to stitch across page breaks
        let pages = self.render_pages(backend)?;
        let analysis = self.analyze(backend)?;

        let mut document = ExamDocument::new(EXAM_TITLE, EXAM_DURATION);
        let mut images = Vec::with_capacity(analysis.ranges.len());

        for range in &analysis.ranges {
            let lines = analysis.question_lines(range);
            let metadata = extract_metadata(lines);
            let regions = crop_regions(lines);

            let Some(stitched) = compose_question_image(&regions, &pages) else {
                log::debug!(
                    "Dropping question {}: no usable crop in {} region(s)",
                    range.id,
                    regions.len()
                );
                continue;
            };

            let image = QuestionImage::new(range.id, stitched);
            document.questions.push(Question::new(
                range.id,
                config.image_path_for(&image.file_name),
                metadata,
            ));
            images.push(image);
        }

        log::info!(
            "Found {} question markers, kept {} questions",
            analysis.ranges.len(),
            document.question_count()
        );

        Ok(ExamOutput { document, images })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryBackend, MemoryPage};
    use crate::model::{PageSize, QuestionType};

    #[test]
    fn test_analyze_skips_unreadable_page() {
        let backend = MemoryBackend::new()
            .with_page(
                MemoryPage::blank(PageSize::a4(), 1.0)
                    .with_line("Q #1", 100.0, 112.0)
                    .with_line("body", 120.0, 132.0),
            )
            .with_page(MemoryPage::blank(PageSize::a4(), 1.0).with_unreadable_text());

        let analysis = GateStandardParser::new().analyze(&backend).unwrap();
        assert_eq!(analysis.page_count, 2);
        assert_eq!(analysis.lines.len(), 2);
        assert_eq!(analysis.ranges.len(), 1);
    }

    #[test]
    fn test_parse_drops_degenerate_question() {
        let backend = MemoryBackend::new().with_page(
            MemoryPage::blank(PageSize::a4(), 1.0)
                .with_line("Q #1", 100.0, 112.0)
                .with_line("Correct Answer: A", 109.0, 121.0)
                .with_line("Q #2 Numerical Type", 200.0, 212.0)
                .with_line("Award: 2", 220.0, 232.0),
        );

        let output = GateStandardParser::new()
            .parse(&backend, &ExamConfig::new("mock.pdf"))
            .unwrap();

        assert_eq!(output.document.question_count(), 1);
        let question = &output.document.questions[0];
        assert_eq!(question.id, 2);
        assert_eq!(question.question_type, QuestionType::Nat);
        assert_eq!(question.image_path, "/output_images/q_2.png");
        assert_eq!(output.images.len(), 1);
        assert_eq!(output.images[0].file_name, "q_2.png");
    }
}
