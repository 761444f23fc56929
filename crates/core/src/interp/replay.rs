//! Replaying an operation tape.
//!
//! [`ContentReplay`] walks a page's operations once, in order, keeping the
//! graphics state stack, text state, current path, marked-content stack
//! and form recursion stack. It emits letters, painted paths, image
//! records and marked-content regions. Operator handlers live in
//! [`super::ops`], one file per operator group.

use super::operation::GraphicsStateOperation;
use super::options::ContentOptions;
use crate::codec::filters::FilterProvider;
use crate::content::letter::Letter;
use crate::content::marked::{Counts, MarkedContentElement, MarkedContentStack};
use crate::content::path::{FillingRule, PdfPath, Subpath};
use crate::content::resources::ResourceStore;
use crate::error::{PdfError, Result};
use crate::image::reference::ImageReference;
use crate::model::state::PDFGraphicState;
use crate::parser::content::ContentParser;
use crate::parser::scanner::TokenScanner;
use crate::utils::Matrix;
use std::sync::Arc;
use tracing::{trace, warn};

/// Everything a replay produced.
pub(crate) struct ReplayOutput {
    pub(crate) letters: Vec<Letter>,
    pub(crate) paths: Vec<PdfPath>,
    pub(crate) images: Vec<ImageReference>,
    pub(crate) marked: Vec<MarkedContentElement>,
    pub(crate) scopes: Vec<Arc<dyn ResourceStore>>,
}

pub(crate) struct ContentReplay {
    pub(crate) scanner: Arc<dyn TokenScanner>,
    pub(crate) filters: Arc<dyn FilterProvider>,
    pub(crate) parser: Option<Arc<dyn ContentParser>>,
    pub(crate) options: ContentOptions,

    /// Resource stores seen so far; index 0 is the page's.
    pub(crate) scopes: Vec<Arc<dyn ResourceStore>>,
    /// Index into `scopes` of the store in effect.
    pub(crate) scope: usize,

    pub(crate) gstack: Vec<PDFGraphicState>,
    pub(crate) state: PDFGraphicState,
    pub(crate) subpaths: Vec<Subpath>,
    pub(crate) pending_clip: Option<FillingRule>,

    pub(crate) letters: Vec<Letter>,
    pub(crate) paths: Vec<PdfPath>,
    pub(crate) images: Vec<ImageReference>,
    pub(crate) marked: MarkedContentStack,

    /// Forms being replayed, innermost last.
    pub(crate) xobj_stack: Vec<String>,
    /// Number of text-showing operators run so far.
    pub(crate) text_sequence: usize,
}

impl ContentReplay {
    pub(crate) fn new(
        scanner: Arc<dyn TokenScanner>,
        filters: Arc<dyn FilterProvider>,
        resources: Arc<dyn ResourceStore>,
        parser: Option<Arc<dyn ContentParser>>,
        options: ContentOptions,
        ctm: Matrix,
    ) -> Self {
        Self {
            scanner,
            filters,
            parser,
            options,
            scopes: vec![resources],
            scope: 0,
            gstack: Vec::new(),
            state: PDFGraphicState::new(ctm),
            subpaths: Vec::new(),
            pending_clip: None,
            letters: Vec::new(),
            paths: Vec::new(),
            images: Vec::new(),
            marked: MarkedContentStack::default(),
            xobj_stack: Vec::new(),
            text_sequence: 0,
        }
    }

    /// The resource store in effect.
    pub(crate) fn resources(&self) -> Arc<dyn ResourceStore> {
        Arc::clone(&self.scopes[self.scope])
    }

    /// Current output lengths, used to delimit marked content.
    pub(crate) fn counts(&self) -> Counts {
        Counts {
            letters: self.letters.len(),
            paths: self.paths.len(),
            images: self.images.len(),
        }
    }

    /// Report a malformed sub-element.
    ///
    /// Lenient replays log and carry on; strict replays fail with a
    /// content error naming the operator.
    pub(crate) fn recover(&self, operator: &str, msg: impl Into<String>) -> Result<()> {
        let msg = msg.into();
        if self.options.lenient {
            warn!(operator, %msg, "skipping malformed content");
            Ok(())
        } else {
            Err(PdfError::content(operator, msg))
        }
    }

    pub(crate) fn run(&mut self, operations: &[GraphicsStateOperation]) -> Result<()> {
        for op in operations {
            self.execute(op)?;
        }
        Ok(())
    }

    fn execute(&mut self, op: &GraphicsStateOperation) -> Result<()> {
        use GraphicsStateOperation as Op;
        match op {
            Op::Push => self.do_q(),
            Op::Pop => self.do_Q()?,
            Op::ModifyCtm(m) => self.do_cm(*m),
            Op::SetLineWidth(w) => self.do_w(*w),
            Op::SetLineCap(cap) => self.do_J(*cap),
            Op::SetLineJoin(join) => self.do_j(*join),
            Op::SetMiterLimit(limit) => self.do_M(*limit),
            Op::SetLineDash { array, phase } => self.do_d(array, *phase),
            Op::SetRenderingIntent(intent) => self.do_ri(intent),
            Op::SetFlatness(flatness) => self.do_i(*flatness),
            Op::SetNamedGraphicsState(name) => self.do_gs(name)?,

            Op::BeginSubpath { x, y } => self.do_m(*x, *y),
            Op::AppendLine { x, y } => self.do_l(*x, *y)?,
            Op::AppendCurve {
                x1,
                y1,
                x2,
                y2,
                x3,
                y3,
            } => self.do_c(*x1, *y1, *x2, *y2, *x3, *y3)?,
            Op::AppendCurveInitialReplicated { x2, y2, x3, y3 } => {
                self.do_v(*x2, *y2, *x3, *y3)?;
            }
            Op::AppendCurveFinalReplicated { x1, y1, x3, y3 } => {
                self.do_y(*x1, *y1, *x3, *y3)?;
            }
            Op::CloseSubpath => self.do_h(),
            Op::AppendRectangle {
                x,
                y,
                width,
                height,
            } => self.do_re(*x, *y, *width, *height),

            Op::StrokePath => self.do_S(),
            Op::CloseAndStrokePath => self.do_s(),
            Op::FillNonZero => self.do_f(),
            Op::FillNonZeroCompat => self.do_F(),
            Op::FillEvenOdd => self.do_f_star(),
            Op::FillStrokeNonZero => self.do_B(),
            Op::FillStrokeEvenOdd => self.do_B_star(),
            Op::CloseFillStrokeNonZero => self.do_b(),
            Op::CloseFillStrokeEvenOdd => self.do_b_star(),
            Op::EndPath => self.do_n(),
            Op::ClipNonZero => self.do_W(),
            Op::ClipEvenOdd => self.do_W_star(),

            Op::BeginText => self.do_BT(),
            Op::EndText => self.do_ET(),
            Op::SetCharacterSpacing(v) => self.do_Tc(*v),
            Op::SetWordSpacing(v) => self.do_Tw(*v),
            Op::SetHorizontalScaling(v) => self.do_Tz(*v),
            Op::SetTextLeading(v) => self.do_TL(*v),
            Op::SetFontAndSize { name, size } => self.do_Tf(name, *size)?,
            Op::SetTextRenderingMode(code) => self.do_Tr(*code)?,
            Op::SetTextRise(v) => self.do_Ts(*v),
            Op::MoveToNextLineWithOffset { tx, ty } => self.do_Td(*tx, *ty),
            Op::MoveToNextLineWithOffsetSetLeading { tx, ty } => self.do_TD(*tx, *ty),
            Op::SetTextMatrix(m) => self.do_Tm(*m),
            Op::MoveToNextLine => self.do_T_star(),
            Op::ShowText(s) => self.do_Tj(s)?,
            Op::ShowTextsWithPositioning(seq) => self.do_TJ(seq)?,
            Op::MoveToNextLineShowText(s) => self.do_quote(s)?,
            Op::MoveToNextLineShowTextWithSpacing {
                word_spacing,
                char_spacing,
                text,
            } => self.do_doublequote(*word_spacing, *char_spacing, text)?,

            Op::SetStrokeColorSpace(name) => self.do_CS(name)?,
            Op::SetNonStrokeColorSpace(name) => self.do_cs(name)?,
            Op::SetStrokeColor(components) => self.do_SC(components),
            Op::SetNonStrokeColor(components) => self.do_sc(components),
            Op::SetStrokeColorAdvanced {
                components,
                pattern,
            } => self.do_SCN(components, pattern.as_deref()),
            Op::SetNonStrokeColorAdvanced {
                components,
                pattern,
            } => self.do_scn(components, pattern.as_deref()),
            Op::SetStrokeGray(g) => self.do_G(*g),
            Op::SetNonStrokeGray(g) => self.do_g(*g),
            Op::SetStrokeRgb(r, g, b) => self.do_RG(*r, *g, *b),
            Op::SetNonStrokeRgb(r, g, b) => self.do_rg(*r, *g, *b),
            Op::SetStrokeCmyk(c, m, y, k) => self.do_K(*c, *m, *y, *k),
            Op::SetNonStrokeCmyk(c, m, y, k) => self.do_k(*c, *m, *y, *k),

            Op::InvokeXObject(name) => self.do_Do(name)?,
            Op::InlineImage { dict, data } => self.do_EI(dict, data),
            Op::BeginMarkedContent(tag) => self.do_BMC(tag),
            Op::BeginMarkedContentWithProperties { tag, properties } => {
                self.do_BDC(tag, properties)?;
            }
            Op::EndMarkedContent => self.do_EMC()?,

            // Recorded on the tape only.
            Op::SetGlyphWidth { .. }
            | Op::SetGlyphWidthAndBoundingBox { .. }
            | Op::PaintShading(_)
            | Op::MarkedContentPoint(_)
            | Op::MarkedContentPointWithProperties { .. }
            | Op::BeginCompatibility
            | Op::EndCompatibility => {}
            Op::Unknown { operator, .. } => {
                trace!(operator = operator.as_str(), "ignoring unknown operator");
            }
        }
        Ok(())
    }

    /// Close the replay and hand over what it produced.
    pub(crate) fn finish(self) -> Result<ReplayOutput> {
        let open = self.marked.depth();
        if open > 0 {
            self.recover("EMC", format!("{open} marked-content sequences left open"))?;
        }
        let at = self.counts();
        Ok(ReplayOutput {
            marked: self.marked.finish(at),
            letters: self.letters,
            paths: self.paths,
            images: self.images,
            scopes: self.scopes,
        })
    }
}
