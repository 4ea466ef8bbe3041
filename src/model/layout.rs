//! Text layout types.

use serde::{Deserialize, Serialize};

/// Size of a page in coordinate space (points).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    /// Page width in points
    pub width: f32,

    /// Page height in points
    pub height: f32,
}

impl PageSize {
    /// Create a page size.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A4 portrait (210 x 297 mm).
    pub fn a4() -> Self {
        Self::new(595.0, 842.0)
    }
}

/// A positioned word fragment from a page's text layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// The fragment text
    pub text: String,
    /// Left edge
    pub left: f32,
    /// Top edge (distance from the top of the page)
    pub top: f32,
    /// Right edge
    pub right: f32,
    /// Bottom edge (distance from the top of the page)
    pub bottom: f32,
}

impl Word {
    /// Create a word fragment.
    pub fn new(text: impl Into<String>, left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            text: text.into(),
            left,
            top,
            right,
            bottom,
        }
    }
}

/// A horizontal band of text on one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    /// Word texts joined by single spaces
    pub text: String,
    /// Top of the first word
    pub top: f32,
    /// Bottom of the last word
    pub bottom: f32,
    /// Zero-based page index
    pub page: usize,
    /// Height of the owning page in points
    pub page_height: f32,
    /// Width of the owning page in points
    pub page_width: f32,
}

impl Line {
    /// Create a line on `page`.
    pub fn new(text: impl Into<String>, top: f32, bottom: f32, page: usize, size: PageSize) -> Self {
        Self {
            text: text.into(),
            top,
            bottom,
            page,
            page_height: size.height,
            page_width: size.width,
        }
    }

    /// Whether the line text contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }
}
