//! Glyphs produced by text-showing operators.

use crate::model::state::{Color, TextRenderingMode};
use crate::utils::{Matrix, Point, Rect, get_bound};

/// One shown character, positioned in device space.
#[derive(Debug, Clone, PartialEq)]
pub struct Letter {
    /// Unicode text for the character code, or `(cid:N)` when unmapped.
    pub value: String,
    pub code: u32,
    /// Resource name the font was selected under (`/F1`).
    pub font_name: Option<String>,
    /// `/BaseFont` of the font, when known.
    pub base_font: Option<String>,
    /// Size operand of `Tf`.
    pub font_size: f64,
    /// Rendered size after the text and transformation matrices.
    pub point_size: f64,
    /// Text rendering matrix at the time the glyph was shown.
    pub transform: Matrix,
    pub start_baseline: Point,
    pub end_baseline: Point,
    pub width: f64,
    pub render_mode: TextRenderingMode,
    pub fill_color: Color,
    pub stroke_color: Color,
    /// Index of the text-showing operator that produced this letter.
    pub text_sequence: usize,
}

impl Letter {
    /// Axis-aligned box from the baseline up to the point size.
    pub fn bounds(&self) -> Rect {
        let (x0, y0) = self.start_baseline;
        let (x1, y1) = self.end_baseline;
        get_bound([(x0, y0), (x1, y1), (x0, y0 + self.point_size), (x1, y1 + self.point_size)])
    }

    pub fn is_whitespace(&self) -> bool {
        !self.value.is_empty() && self.value.chars().all(char::is_whitespace)
    }
}
