//! Graphics state operators.
//!
//! Handles: q, Q, cm, w, J, j, M, d, ri, i, gs
//!
//! - q/Q: Push/pop graphics state
//! - cm: Concatenate transformation matrix
//! - w, J, j, M, d: Line styling (width, cap, join, miter limit, dash)
//! - ri, i: Rendering intent and flatness
//! - gs: Set parameters from an `/ExtGState` resource

use crate::error::Result;
use crate::interp::replay::ContentReplay;
use crate::model::objects::PDFObject;
use crate::model::state::DashPattern;
use crate::utils::{Matrix, mult_matrix};
use tracing::trace;

#[allow(non_snake_case)]
impl ContentReplay {
    /// Saves the current graphics state to the stack.
    ///
    /// PDF operator: `q`
    pub(crate) fn do_q(&mut self) {
        self.gstack.push(self.state.clone());
    }

    /// Restores the graphics state from the stack.
    ///
    /// PDF operator: `Q`
    pub(crate) fn do_Q(&mut self) -> Result<()> {
        match self.gstack.pop() {
            Some(state) => {
                self.state = state;
                Ok(())
            }
            None => self.recover("Q", "graphics state stack is empty"),
        }
    }

    /// Concatenates a matrix to the current transformation matrix.
    ///
    /// PDF operator: `cm`
    pub(crate) fn do_cm(&mut self, matrix: Matrix) {
        self.state.ctm = mult_matrix(matrix, self.state.ctm);
    }

    /// PDF operator: `w`
    pub(crate) fn do_w(&mut self, width: f64) {
        self.state.line.width = width;
    }

    /// PDF operator: `J`
    pub(crate) fn do_J(&mut self, cap: i64) {
        self.state.line.cap = cap;
    }

    /// PDF operator: `j`
    pub(crate) fn do_j(&mut self, join: i64) {
        self.state.line.join = join;
    }

    /// PDF operator: `M`
    pub(crate) fn do_M(&mut self, limit: f64) {
        self.state.line.miter_limit = limit;
    }

    /// Sets the line dash pattern.
    ///
    /// PDF operator: `d`
    pub(crate) fn do_d(&mut self, array: &[f64], phase: f64) {
        self.state.line.dash = DashPattern {
            array: array.to_vec(),
            phase,
        };
    }

    /// Sets the color rendering intent.
    ///
    /// PDF operator: `ri`
    pub(crate) fn do_ri(&mut self, intent: &str) {
        self.state.intent = Some(intent.to_string());
    }

    /// PDF operator: `i`
    pub(crate) fn do_i(&mut self, flatness: f64) {
        self.state.flatness = flatness;
    }

    /// Applies the line, intent and flatness entries of a named
    /// graphics state parameter dictionary.
    ///
    /// PDF operator: `gs`
    pub(crate) fn do_gs(&mut self, name: &str) -> Result<()> {
        let params = match self.resources().ext_graphics_state(name) {
            Ok(Some(params)) => params,
            Ok(None) => return self.recover("gs", format!("ExtGState /{name} not found")),
            Err(e) => return self.recover("gs", format!("ExtGState /{name}: {e}")),
        };

        for (key, value) in &params {
            let value = match self.scanner.resolve(value) {
                Ok(v) => v,
                Err(e) => {
                    self.recover("gs", format!("/{key} in /{name}: {e}"))?;
                    continue;
                }
            };
            match (key.as_str(), &value) {
                ("LW", v) => {
                    if let Ok(w) = v.as_num() {
                        self.do_w(w);
                    }
                }
                ("LC", v) => {
                    if let Ok(cap) = v.as_int() {
                        self.do_J(cap);
                    }
                }
                ("LJ", v) => {
                    if let Ok(join) = v.as_int() {
                        self.do_j(join);
                    }
                }
                ("ML", v) => {
                    if let Ok(limit) = v.as_num() {
                        self.do_M(limit);
                    }
                }
                // [[dash array] phase]
                ("D", PDFObject::Array(items)) => {
                    if let [PDFObject::Array(array), phase] = items.as_slice() {
                        let array: Vec<f64> =
                            array.iter().filter_map(|v| v.as_num().ok()).collect();
                        self.do_d(&array, phase.as_num().unwrap_or(0.0));
                    }
                }
                ("RI", PDFObject::Name(intent)) => self.do_ri(intent),
                ("FL", v) => {
                    if let Ok(flatness) = v.as_num() {
                        self.do_i(flatness);
                    }
                }
                (other, _) => trace!(key = other, "ExtGState entry not applied"),
            }
        }
        Ok(())
    }
}
