//! Graphics and text state tracked while replaying a content stream.

use super::color::PDFColorSpace;
use crate::font::PdfFont;
use crate::utils::{MATRIX_IDENTITY, Matrix};
use std::sync::Arc;

/// Color value types used in PDF graphics state.
#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    /// Greyscale color (0.0 = black, 1.0 = white)
    Gray(f64),
    /// RGB color
    Rgb(f64, f64, f64),
    /// CMYK color
    Cmyk(f64, f64, f64, f64),
    /// Components in a color space other than the device families
    /// (ICCBased, Separation, DeviceN, Lab, Indexed)
    Components(Vec<f64>),
    /// Colored tiling pattern (PaintType=1) - just the pattern name
    PatternColored(String),
    /// Uncolored tiling pattern (PaintType=2) - base color + pattern name
    PatternUncolored(Box<Color>, String),
}

impl Default for Color {
    fn default() -> Self {
        Color::Gray(0.0)
    }
}

impl Color {
    /// Build a color from operands, choosing the variant by component count.
    pub fn from_components(components: &[f64]) -> Self {
        match *components {
            [g] => Color::Gray(g),
            [r, g, b] => Color::Rgb(r, g, b),
            [c, m, y, k] => Color::Cmyk(c, m, y, k),
            _ => Color::Components(components.to_vec()),
        }
    }

    /// The numeric components.
    ///
    /// For pattern colors:
    /// - PatternColored: returns empty vec (no numeric components)
    /// - PatternUncolored: returns the base color's components
    pub fn to_vec(&self) -> Vec<f64> {
        match self {
            Color::Gray(g) => vec![*g],
            Color::Rgb(r, g, b) => vec![*r, *g, *b],
            Color::Cmyk(c, m, y, k) => vec![*c, *m, *y, *k],
            Color::Components(v) => v.clone(),
            Color::PatternColored(_) => vec![],
            Color::PatternUncolored(base, _) => base.to_vec(),
        }
    }

    /// Get the pattern name if this is a pattern color.
    pub fn pattern_name(&self) -> Option<&str> {
        match self {
            Color::PatternColored(name) => Some(name),
            Color::PatternUncolored(_, name) => Some(name),
            _ => None,
        }
    }

    /// Check if this color is a pattern color.
    pub fn is_pattern(&self) -> bool {
        matches!(
            self,
            Color::PatternColored(_) | Color::PatternUncolored(_, _)
        )
    }

    /// Initial color for a newly selected color space.
    pub fn initial_for(space: &PDFColorSpace) -> Self {
        match (space.name.as_str(), space.ncomponents) {
            ("DeviceCMYK", _) => Color::Cmyk(0.0, 0.0, 0.0, 1.0),
            ("Pattern", _) => Color::PatternColored(String::new()),
            (_, 3) => Color::Rgb(0.0, 0.0, 0.0),
            (_, 1) => Color::Gray(0.0),
            (_, n) => Color::Components(vec![0.0; n]),
        }
    }
}

/// Text rendering mode set by `Tr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextRenderingMode {
    #[default]
    Fill,
    Stroke,
    FillStroke,
    Invisible,
    FillClip,
    StrokeClip,
    FillStrokeClip,
    Clip,
}

impl TextRenderingMode {
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Fill),
            1 => Some(Self::Stroke),
            2 => Some(Self::FillStroke),
            3 => Some(Self::Invisible),
            4 => Some(Self::FillClip),
            5 => Some(Self::StrokeClip),
            6 => Some(Self::FillStrokeClip),
            7 => Some(Self::Clip),
            _ => None,
        }
    }

    pub const fn code(self) -> i64 {
        self as i64
    }

    /// Whether glyphs are painted at all.
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::Invisible | Self::Clip)
    }
}

/// Dash pattern set by `d`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashPattern {
    pub array: Vec<f64>,
    pub phase: f64,
}

impl DashPattern {
    pub fn is_solid(&self) -> bool {
        self.array.is_empty()
    }
}

/// Stroke parameters copied into every painted path.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub width: f64,
    /// 0 butt, 1 round, 2 projecting square
    pub cap: i64,
    /// 0 miter, 1 round, 2 bevel
    pub join: i64,
    pub miter_limit: f64,
    pub dash: DashPattern,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            cap: 0,
            join: 0,
            miter_limit: 10.0,
            dash: DashPattern::default(),
        }
    }
}

/// PDF Text State - manages text positioning and rendering parameters.
#[derive(Debug, Clone)]
pub struct PDFTextState {
    /// Current font (None if not set or not resolvable)
    pub font: Option<Arc<dyn PdfFont>>,
    /// Current font resource name (e.g., "F1")
    pub fontname: Option<String>,
    /// Font size in user units
    pub fontsize: f64,
    /// Character spacing
    pub charspace: f64,
    /// Word spacing (applied to single-byte code 32)
    pub wordspace: f64,
    /// Horizontal scaling percentage (100 = normal)
    pub scaling: f64,
    /// Text leading (vertical distance for T* operations)
    pub leading: f64,
    pub render: TextRenderingMode,
    /// Text rise (superscript/subscript offset)
    pub rise: f64,
    /// Text matrix (Tm)
    pub matrix: Matrix,
    /// Text line matrix (Tlm)
    pub linematrix: Matrix,
}

impl PDFTextState {
    /// Create a new text state with default values.
    pub fn new() -> Self {
        Self {
            font: None,
            fontname: None,
            fontsize: 0.0,
            charspace: 0.0,
            wordspace: 0.0,
            scaling: 100.0,
            leading: 0.0,
            render: TextRenderingMode::Fill,
            rise: 0.0,
            matrix: MATRIX_IDENTITY,
            linematrix: MATRIX_IDENTITY,
        }
    }

    /// Reset text matrix and line matrix to identity.
    ///
    /// Called at the start of each text object (BT operator).
    pub fn reset(&mut self) {
        self.matrix = MATRIX_IDENTITY;
        self.linematrix = MATRIX_IDENTITY;
    }

    /// Horizontal scaling as a factor.
    pub fn horizontal_scale(&self) -> f64 {
        self.scaling / 100.0
    }
}

impl Default for PDFTextState {
    fn default() -> Self {
        Self::new()
    }
}

/// PDF Graphics State - the parameters saved by `q` and restored by `Q`.
#[derive(Debug, Clone)]
pub struct PDFGraphicState {
    /// Current transformation matrix
    pub ctm: Matrix,
    pub line: LineStyle,
    /// Rendering intent name
    pub intent: Option<String>,
    /// Flatness tolerance
    pub flatness: f64,

    /// Stroking color
    pub scolor: Color,
    /// Stroking color space
    pub scs: PDFColorSpace,
    /// Stroking color space resource name, when set by `CS`
    pub scs_name: Option<String>,

    /// Non-stroking (fill) color
    pub ncolor: Color,
    /// Non-stroking color space
    pub ncs: PDFColorSpace,
    /// Non-stroking color space resource name, when set by `cs`
    pub ncs_name: Option<String>,

    pub text: PDFTextState,
}

impl PDFGraphicState {
    /// Create new graphics state with default values and the given CTM.
    pub fn new(ctm: Matrix) -> Self {
        Self {
            ctm,
            line: LineStyle::default(),
            intent: None,
            flatness: 1.0,
            scolor: Color::Gray(0.0),
            scs: PDFColorSpace::device_gray(),
            scs_name: None,
            ncolor: Color::Gray(0.0),
            ncs: PDFColorSpace::device_gray(),
            ncs_name: None,
            text: PDFTextState::new(),
        }
    }
}

impl Default for PDFGraphicState {
    fn default() -> Self {
        Self::new(MATRIX_IDENTITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_from_components() {
        assert_eq!(Color::from_components(&[0.5]), Color::Gray(0.5));
        assert_eq!(
            Color::from_components(&[0.1, 0.2]),
            Color::Components(vec![0.1, 0.2])
        );
    }

    #[test]
    fn rendering_mode_codes() {
        assert_eq!(TextRenderingMode::from_code(3), Some(TextRenderingMode::Invisible));
        assert_eq!(TextRenderingMode::Clip.code(), 7);
        assert!(!TextRenderingMode::Invisible.is_visible());
        assert_eq!(TextRenderingMode::from_code(8), None);
    }

    #[test]
    fn pattern_colors_expose_base_components() {
        let base = Color::Rgb(1.0, 0.5, 0.0);
        let uncolored = Color::PatternUncolored(Box::new(base), "P0".into());
        assert!(uncolored.is_pattern());
        assert_eq!(uncolored.pattern_name(), Some("P0"));
        assert_eq!(uncolored.to_vec(), vec![1.0, 0.5, 0.0]);
        assert!(Color::PatternColored("P1".into()).to_vec().is_empty());
        assert_eq!(Color::Gray(0.2).pattern_name(), None);
    }

    #[test]
    fn empty_dash_array_is_solid() {
        assert!(DashPattern::default().is_solid());
        let dashed = DashPattern {
            array: vec![3.0, 1.0],
            phase: 0.0,
        };
        assert!(!dashed.is_solid());
    }
}
