//! Path construction and painting operators.
//!
//! Handles: m, l, c, v, y, h, re, S, s, f, F, f*, B, B*, b, b*, n, W, W*
//!
//! Construction operators map their operands through the CTM as they
//! run. Painting operators turn the current path into a [`PdfPath`] and
//! clear it; `W`/`W*` only mark the path as a clip for the next painting
//! operator.

use crate::content::path::{FillingRule, PdfPath, Subpath};
use crate::error::Result;
use crate::interp::replay::ContentReplay;
use crate::utils::{Point, apply_matrix_pt};

#[allow(non_snake_case)]
impl ContentReplay {
    fn device_point(&self, x: f64, y: f64) -> Point {
        apply_matrix_pt(self.state.ctm, (x, y))
    }

    /// The subpath segments are appended to. A closed subpath continues
    /// as a new subpath from its start point.
    fn open_subpath(&mut self, operator: &str) -> Result<Option<&mut Subpath>> {
        match self.subpaths.last() {
            None => {
                self.recover(operator, "no current point")?;
                return Ok(None);
            }
            Some(last) if last.is_closed() => {
                let start = last.start_point().unwrap_or_default();
                self.subpaths.push(Subpath::new(start));
            }
            Some(_) => {}
        }
        Ok(self.subpaths.last_mut())
    }

    /// Begin a new subpath.
    ///
    /// PDF operator: `m`
    pub(crate) fn do_m(&mut self, x: f64, y: f64) {
        let p = self.device_point(x, y);
        self.subpaths.push(Subpath::new(p));
    }

    /// PDF operator: `l`
    pub(crate) fn do_l(&mut self, x: f64, y: f64) -> Result<()> {
        let p = self.device_point(x, y);
        if let Some(sp) = self.open_subpath("l")? {
            sp.line_to(p);
        }
        Ok(())
    }

    /// PDF operator: `c`
    pub(crate) fn do_c(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
    ) -> Result<()> {
        let (c1, c2, end) = (
            self.device_point(x1, y1),
            self.device_point(x2, y2),
            self.device_point(x3, y3),
        );
        if let Some(sp) = self.open_subpath("c")? {
            sp.cubic_to(c1, c2, end);
        }
        Ok(())
    }

    /// Curve whose first control point is the current point.
    ///
    /// PDF operator: `v`
    pub(crate) fn do_v(&mut self, x2: f64, y2: f64, x3: f64, y3: f64) -> Result<()> {
        let (c2, end) = (self.device_point(x2, y2), self.device_point(x3, y3));
        if let Some(sp) = self.open_subpath("v")? {
            let c1 = sp.current_point().unwrap_or(c2);
            sp.cubic_to(c1, c2, end);
        }
        Ok(())
    }

    /// Curve whose second control point is the end point.
    ///
    /// PDF operator: `y`
    pub(crate) fn do_y(&mut self, x1: f64, y1: f64, x3: f64, y3: f64) -> Result<()> {
        let (c1, end) = (self.device_point(x1, y1), self.device_point(x3, y3));
        if let Some(sp) = self.open_subpath("y")? {
            sp.cubic_to(c1, end, end);
        }
        Ok(())
    }

    /// PDF operator: `h`
    pub(crate) fn do_h(&mut self) {
        if let Some(sp) = self.subpaths.last_mut() {
            sp.close();
        }
    }

    /// Append a closed rectangle subpath.
    ///
    /// PDF operator: `re`
    pub(crate) fn do_re(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let mut sp = Subpath::new(self.device_point(x, y));
        sp.line_to(self.device_point(x + w, y));
        sp.line_to(self.device_point(x + w, y + h));
        sp.line_to(self.device_point(x, y + h));
        sp.close();
        self.subpaths.push(sp);
    }

    fn paint(&mut self, stroke: bool, fill: bool, rule: FillingRule, close: bool) {
        if close {
            self.do_h();
        }
        let subpaths = std::mem::take(&mut self.subpaths);
        if subpaths.is_empty() {
            self.pending_clip = None;
            return;
        }

        if let Some(clip_rule) = self.pending_clip.take()
            && self.options.record_clipping_paths
        {
            self.paths.push(PdfPath {
                subpaths: subpaths.clone(),
                filling_rule: clip_rule,
                is_filled: false,
                is_stroked: false,
                is_clipping: true,
                line: self.state.line.clone(),
                stroke_color: self.state.scolor.clone(),
                fill_color: self.state.ncolor.clone(),
            });
        }

        if stroke || fill {
            self.paths.push(PdfPath {
                subpaths,
                filling_rule: rule,
                is_filled: fill,
                is_stroked: stroke,
                is_clipping: false,
                line: self.state.line.clone(),
                stroke_color: self.state.scolor.clone(),
                fill_color: self.state.ncolor.clone(),
            });
        }
    }

    /// PDF operator: `S`
    pub(crate) fn do_S(&mut self) {
        self.paint(true, false, FillingRule::NonZeroWinding, false);
    }

    /// PDF operator: `s`
    pub(crate) fn do_s(&mut self) {
        self.paint(true, false, FillingRule::NonZeroWinding, true);
    }

    /// PDF operator: `f`
    pub(crate) fn do_f(&mut self) {
        self.paint(false, true, FillingRule::NonZeroWinding, false);
    }

    /// Obsolete spelling of `f`.
    ///
    /// PDF operator: `F`
    pub(crate) fn do_F(&mut self) {
        self.do_f();
    }

    /// PDF operator: `f*`
    pub(crate) fn do_f_star(&mut self) {
        self.paint(false, true, FillingRule::EvenOdd, false);
    }

    /// PDF operator: `B`
    pub(crate) fn do_B(&mut self) {
        self.paint(true, true, FillingRule::NonZeroWinding, false);
    }

    /// PDF operator: `B*`
    pub(crate) fn do_B_star(&mut self) {
        self.paint(true, true, FillingRule::EvenOdd, false);
    }

    /// PDF operator: `b`
    pub(crate) fn do_b(&mut self) {
        self.paint(true, true, FillingRule::NonZeroWinding, true);
    }

    /// PDF operator: `b*`
    pub(crate) fn do_b_star(&mut self) {
        self.paint(true, true, FillingRule::EvenOdd, true);
    }

    /// End the path without painting it.
    ///
    /// PDF operator: `n`
    pub(crate) fn do_n(&mut self) {
        self.paint(false, false, FillingRule::NonZeroWinding, false);
    }

    /// PDF operator: `W`
    pub(crate) fn do_W(&mut self) {
        self.pending_clip = Some(FillingRule::NonZeroWinding);
    }

    /// PDF operator: `W*`
    pub(crate) fn do_W_star(&mut self) {
        self.pending_clip = Some(FillingRule::EvenOdd);
    }
}
