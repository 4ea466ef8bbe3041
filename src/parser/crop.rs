//! Per-page crop rectangles for a question.

use std::collections::BTreeMap;

use crate::model::{CropRegion, Line};

/// Space left between the last content line and an answer footer.
pub const FOOTER_PADDING: f32 = 10.0;

const FOOTER_MARKERS: [&str; 2] = ["Correct Answer:", "Your Answer:"];

/// Whether a line belongs to the answer footer printed under a question.
pub fn is_footer(line: &Line) -> bool {
    FOOTER_MARKERS.iter().any(|m| line.contains(m))
}

/// One crop region per page the question's lines touch, in page order.
///
/// A region spans from the top of the page's first line to the bottom of its
/// last line. When the page holds an answer footer, the region instead ends
/// [`FOOTER_PADDING`] above the first footer line so the answer key stays out
/// of the image. Regions may come out degenerate (`bottom <= top`); the
/// compositor drops those.
pub fn crop_regions(lines: &[Line]) -> Vec<CropRegion> {
    let mut by_page: BTreeMap<usize, Vec<&Line>> = BTreeMap::new();
    for line in lines {
        by_page.entry(line.page).or_default().push(line);
    }

    by_page
        .into_iter()
        .filter_map(|(page, page_lines)| {
            let first = page_lines.first()?;
            let last = page_lines.last()?;

            let bottom = page_lines
                .iter()
                .find(|l| is_footer(l))
                .map(|footer| footer.top - FOOTER_PADDING)
                .unwrap_or(last.bottom);

            Some(CropRegion {
                page,
                top: first.top,
                bottom,
                page_height: first.page_height,
                page_width: first.page_width,
            })
        })
        .collect()
}
