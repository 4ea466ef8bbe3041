//! Question spans and crop rectangles.

use serde::{Deserialize, Serialize};

use super::Line;

/// A contiguous span of the global line stream attributed to one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRange {
    /// Sequential id, 1-based, in discovery order
    pub id: u32,
    /// Index of the boundary line
    pub start: usize,
    /// Index of the last line (inclusive)
    pub end: usize,
    /// Number printed in the `Q #<n>` marker
    pub marker: Option<u32>,
}

impl QuestionRange {
    /// Number of lines in the range.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always `false`: a range starts at its boundary line and `end >= start`,
    /// so [`len`](Self::len) is at least 1.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The lines of this range within `lines`.
    pub fn lines<'a>(&self, lines: &'a [Line]) -> &'a [Line] {
        &lines[self.start..=self.end]
    }
}

/// A page-local rectangle to rasterize for one question.
///
/// Only the vertical extent is tracked; crops always span the full page width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRegion {
    /// Zero-based page index
    pub page: usize,
    /// Top edge in points
    pub top: f32,
    /// Bottom edge in points
    pub bottom: f32,
    /// Page height in points
    pub page_height: f32,
    /// Page width in points
    pub page_width: f32,
}

impl CropRegion {
    /// Height in points; non-positive for degenerate regions.
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}
