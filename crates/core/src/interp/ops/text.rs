//! Text operators.
//!
//! Handles: BT, ET, Tc, Tw, Tz, TL, Tf, Tr, Ts, Td, TD, Tm, T*, Tj, TJ, ', "
//!
//! Text object:
//! - BT/ET: Begin/end text object
//!
//! Text state:
//! - Tc: Character spacing
//! - Tw: Word spacing
//! - Tz: Horizontal scaling
//! - TL: Leading
//! - Tf: Font and size
//! - Tr: Rendering mode
//! - Ts: Rise (baseline offset)
//!
//! Text positioning:
//! - Td/TD: Move to next line (TD also sets leading)
//! - Tm: Set text matrix directly
//! - T*: Move to next line using current leading
//!
//! Text showing:
//! - Tj: Show string
//! - TJ: Show with individual glyph positioning
//! - ': Move to next line and show
//! - ": Set spacing, move to next line, and show

use crate::content::letter::Letter;
use crate::error::Result;
use crate::interp::operation::TextSeqItem;
use crate::interp::replay::ContentReplay;
use crate::model::state::TextRenderingMode;
use crate::utils::{Matrix, apply_matrix_pt, mult_matrix, translate_matrix};

#[allow(non_snake_case)]
impl ContentReplay {
    // ========================================================================
    // Text Object Operators
    // ========================================================================

    /// BT - Begin text object.
    ///
    /// Initializes the text matrix (Tm) and text line matrix (Tlm) to identity.
    pub(crate) fn do_BT(&mut self) {
        self.state.text.reset();
    }

    /// ET - End text object.
    pub(crate) fn do_ET(&mut self) {}

    // ========================================================================
    // Text State Operators
    // ========================================================================

    /// Tc - Set character spacing.
    pub(crate) fn do_Tc(&mut self, charspace: f64) {
        self.state.text.charspace = charspace;
    }

    /// Tw - Set word spacing, applied to single-byte code 32.
    pub(crate) fn do_Tw(&mut self, wordspace: f64) {
        self.state.text.wordspace = wordspace;
    }

    /// Tz - Set horizontal scaling (percent).
    pub(crate) fn do_Tz(&mut self, scaling: f64) {
        self.state.text.scaling = scaling;
    }

    /// TL - Set leading.
    pub(crate) fn do_TL(&mut self, leading: f64) {
        self.state.text.leading = leading;
    }

    /// Tf - Select font and size.
    ///
    /// An unknown font leaves no font selected; text shown until the next
    /// `Tf` is skipped.
    pub(crate) fn do_Tf(&mut self, name: &str, size: f64) -> Result<()> {
        self.state.text.fontname = Some(name.to_string());
        self.state.text.fontsize = size;
        self.state.text.font = None;
        match self.resources().font(name) {
            Ok(Some(font)) => {
                self.state.text.font = Some(font);
                Ok(())
            }
            Ok(None) => self.recover("Tf", format!("font /{name} not found")),
            Err(e) => self.recover("Tf", format!("font /{name}: {e}")),
        }
    }

    /// Tr - Set text rendering mode.
    pub(crate) fn do_Tr(&mut self, code: i64) -> Result<()> {
        match TextRenderingMode::from_code(code) {
            Some(mode) => {
                self.state.text.render = mode;
                Ok(())
            }
            None => self.recover("Tr", format!("invalid rendering mode {code}")),
        }
    }

    /// Ts - Set text rise.
    pub(crate) fn do_Ts(&mut self, rise: f64) {
        self.state.text.rise = rise;
    }

    // ========================================================================
    // Text Positioning Operators
    // ========================================================================

    /// Td - Move to the start of the next line, offset from the current
    /// line start.
    pub(crate) fn do_Td(&mut self, tx: f64, ty: f64) {
        let text = &mut self.state.text;
        text.linematrix = translate_matrix(text.linematrix, (tx, ty));
        text.matrix = text.linematrix;
    }

    /// TD - Like Td, and set leading to `-ty`.
    pub(crate) fn do_TD(&mut self, tx: f64, ty: f64) {
        self.state.text.leading = -ty;
        self.do_Td(tx, ty);
    }

    /// Tm - Set text matrix and text line matrix.
    pub(crate) fn do_Tm(&mut self, matrix: Matrix) {
        self.state.text.matrix = matrix;
        self.state.text.linematrix = matrix;
    }

    /// T* - Move to the start of the next line.
    pub(crate) fn do_T_star(&mut self) {
        let leading = self.state.text.leading;
        self.do_Td(0.0, -leading);
    }

    // ========================================================================
    // Text Showing Operators
    // ========================================================================

    /// Tj - Show a string.
    pub(crate) fn do_Tj(&mut self, s: &[u8]) -> Result<()> {
        let shown = self.show_string("Tj", s);
        self.text_sequence += 1;
        shown
    }

    /// TJ - Show strings with individual positioning.
    ///
    /// Numbers move the pen left by thousandths of text space.
    pub(crate) fn do_TJ(&mut self, seq: &[TextSeqItem]) -> Result<()> {
        for item in seq {
            match item {
                TextSeqItem::Number(adjust) => {
                    let text = &mut self.state.text;
                    let tx = -adjust / 1000.0 * text.fontsize * text.horizontal_scale();
                    text.matrix = translate_matrix(text.matrix, (tx, 0.0));
                }
                TextSeqItem::Bytes(s) => self.show_string("TJ", s)?,
            }
        }
        self.text_sequence += 1;
        Ok(())
    }

    /// ' - Move to the next line and show a string.
    pub(crate) fn do_quote(&mut self, s: &[u8]) -> Result<()> {
        self.do_T_star();
        let shown = self.show_string("'", s);
        self.text_sequence += 1;
        shown
    }

    /// " - Set word and character spacing, move to the next line and show.
    pub(crate) fn do_doublequote(&mut self, aw: f64, ac: f64, s: &[u8]) -> Result<()> {
        self.do_Tw(aw);
        self.do_Tc(ac);
        self.do_T_star();
        let shown = self.show_string("\"", s);
        self.text_sequence += 1;
        shown
    }

    /// Emit one letter per character code and advance the text matrix.
    fn show_string(&mut self, operator: &str, s: &[u8]) -> Result<()> {
        let Some(font) = self.state.text.font.clone() else {
            return self.recover(operator, "text shown with no font selected");
        };
        let text = &self.state.text;
        let (fontsize, hscale) = (text.fontsize, text.horizontal_scale());
        let (charspace, wordspace, rise) = (text.charspace, text.wordspace, text.rise);
        let font_name = text.fontname.clone();
        let render_mode = text.render;
        let ctm = self.state.ctm;

        for cc in font.decode(s) {
            let tm = self.state.text.matrix;
            let trm = mult_matrix(
                mult_matrix((fontsize * hscale, 0.0, 0.0, fontsize, 0.0, rise), tm),
                ctm,
            );
            let w0 = font.char_width(cc.code);
            let start_baseline = apply_matrix_pt(trm, (0.0, 0.0));
            let end_baseline = apply_matrix_pt(trm, (w0, 0.0));
            let (_, _, c, d, _, _) = mult_matrix(tm, ctm);

            let width =
                (end_baseline.0 - start_baseline.0).hypot(end_baseline.1 - start_baseline.1);
            self.letters.push(Letter {
                value: font
                    .to_unichr(cc.code)
                    .unwrap_or_else(|| format!("(cid:{})", cc.code)),
                code: cc.code,
                font_name: font_name.clone(),
                base_font: font.fontname().map(str::to_owned),
                font_size: fontsize,
                point_size: fontsize * c.hypot(d),
                transform: trm,
                start_baseline,
                end_baseline,
                width,
                render_mode,
                fill_color: self.state.ncolor.clone(),
                stroke_color: self.state.scolor.clone(),
                text_sequence: self.text_sequence,
            });

            let word = if cc.len == 1 && cc.code == 32 {
                wordspace
            } else {
                0.0
            };
            let tx = (w0 * fontsize + charspace + word) * hscale;
            self.state.text.matrix = translate_matrix(tm, (tx, 0.0));
        }
        Ok(())
    }
}
