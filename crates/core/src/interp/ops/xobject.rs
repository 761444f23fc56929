//! XObject, inline image and marked content operators.
//!
//! Handles: Do, BI/ID/EI, BMC, BDC, EMC
//!
//! XObjects:
//! - Do: images become deferred records; forms are decoded, parsed and
//!   replayed with their own resources layered over the caller's
//!
//! Inline images:
//! - BI/ID/EI arrive as one operation; the image is parsed immediately and
//!   a decode failure stays on the record until the images are enumerated
//!
//! Marked content:
//! - BMC/BDC: open a region, BDC with properties inline or by name
//! - EMC: close the innermost region

use crate::codec::filters::decode_stream;
use crate::content::resources::{DictResourceStore, ResourceStore};
use crate::error::Result;
use crate::image::decode::{ImageDecoder, expand_inline_dict};
use crate::image::reference::{ImageReference, InlineImageRecord, XObjectContentRecord};
use crate::interp::replay::ContentReplay;
use crate::model::objects::{PDFObject, PDFStream};
use crate::parser::scanner::get_resolved;
use crate::utils::{MATRIX_IDENTITY, Matrix, mult_matrix};
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[allow(non_snake_case)]
impl ContentReplay {
    /// Invoke a named XObject.
    ///
    /// PDF operator: `Do`
    pub(crate) fn do_Do(&mut self, name: &str) -> Result<()> {
        let stream = match self.resources().xobject(name) {
            Ok(Some(stream)) => stream,
            Ok(None) => return self.recover("Do", format!("XObject /{name} not found")),
            Err(e) => return self.recover("Do", format!("XObject /{name}: {e}")),
        };
        let subtype = match get_resolved(&stream.attrs, "Subtype", self.scanner.as_ref()) {
            Ok(Some(PDFObject::Name(subtype))) => subtype,
            _ => String::new(),
        };

        match subtype.as_str() {
            "Image" => {
                self.images.push(ImageReference::XObject(XObjectContentRecord {
                    name: name.to_string(),
                    reference: stream.reference,
                    transform: self.state.ctm,
                    rendering_intent: self.state.intent.clone(),
                    fill_color: self.state.ncolor.clone(),
                    fill_color_space: self.state.ncs.clone(),
                    scope: self.scope,
                    stream,
                }));
                Ok(())
            }
            "Form" => self.replay_form(name, stream),
            "PS" => {
                debug!(name, "PostScript XObject ignored");
                Ok(())
            }
            other => self.recover("Do", format!("XObject /{name} has unknown subtype /{other}")),
        }
    }

    /// Replay a form XObject's content in a saved graphics state.
    fn replay_form(&mut self, name: &str, form: PDFStream) -> Result<()> {
        let key = form
            .reference
            .map_or_else(|| format!("/{name}"), |r| r.to_string());
        if self.xobj_stack.contains(&key) {
            return self.recover("Do", format!("form /{name} invokes itself"));
        }
        if self.xobj_stack.len() >= self.options.max_form_depth {
            return self.recover(
                "Do",
                format!("form /{name} nested deeper than {}", self.options.max_form_depth),
            );
        }
        let Some(parser) = self.parser.clone() else {
            return self.recover("Do", format!("form /{name} needs a content parser"));
        };
        let operations = match decode_stream(&form, self.filters.as_ref())
            .and_then(|data| parser.parse(&data))
        {
            Ok(operations) => operations,
            Err(e) => return self.recover("Do", format!("form /{name}: {e}")),
        };

        let scanner = self.scanner.as_ref();
        let matrix = match get_resolved(&form.attrs, "Matrix", scanner) {
            Ok(Some(PDFObject::Array(items))) => parse_matrix(&items).unwrap_or(MATRIX_IDENTITY),
            _ => MATRIX_IDENTITY,
        };
        let own_resources = match get_resolved(&form.attrs, "Resources", scanner) {
            Ok(Some(PDFObject::Dict(resources))) => Some(resources),
            _ => None,
        };

        let saved_scope = self.scope;
        if let Some(resources) = own_resources {
            let store: Arc<dyn ResourceStore> = Arc::new(
                DictResourceStore::new(
                    resources,
                    Arc::clone(&self.scanner),
                    Arc::clone(&self.filters),
                )
                .with_parent(self.resources()),
            );
            self.scopes.push(store);
            self.scope = self.scopes.len() - 1;
        }
        let saved_state = self.state.clone();
        let saved_gstack = std::mem::take(&mut self.gstack);
        let saved_path = std::mem::take(&mut self.subpaths);
        let saved_clip = self.pending_clip.take();

        self.state.ctm = mult_matrix(matrix, self.state.ctm);
        self.xobj_stack.push(key);
        debug!(name, depth = self.xobj_stack.len(), "replaying form XObject");
        let result = self.run(&operations);
        self.xobj_stack.pop();

        self.state = saved_state;
        self.gstack = saved_gstack;
        self.subpaths = saved_path;
        self.pending_clip = saved_clip;
        self.scope = saved_scope;
        result
    }

    /// Capture an inline image.
    ///
    /// The record is kept even when the data does not decode; the failure
    /// is reported by [`PageContent::images`](crate::content::PageContent::images).
    ///
    /// PDF operators: `BI` ... `ID` ... `EI`
    pub(crate) fn do_EI(&mut self, dict: &HashMap<String, PDFObject>, data: &Bytes) {
        let attrs = expand_inline_dict(dict);
        let store = self.resources();
        let decoder = ImageDecoder {
            scanner: self.scanner.as_ref(),
            filters: self.filters.as_ref(),
            resources: store.as_ref(),
            mask_policy: self.options.mask_size_mismatch,
        };
        let parsed =
            decoder.decode_inline(&attrs, data, self.state.ctm, self.state.intent.clone());
        if let Err(e) = &parsed {
            debug!(error = %e, "inline image does not decode");
        }
        self.images.push(ImageReference::Inline(InlineImageRecord::new(
            attrs,
            data.clone(),
            self.state.ctm,
            self.state.intent.clone(),
            parsed,
        )));
    }

    /// Begin a marked-content sequence.
    ///
    /// PDF operator: `BMC`
    pub(crate) fn do_BMC(&mut self, tag: &str) {
        let at = self.counts();
        self.marked.begin(tag.to_string(), None, at);
    }

    /// Begin a marked-content sequence with a property list.
    ///
    /// PDF operator: `BDC`
    pub(crate) fn do_BDC(&mut self, tag: &str, properties: &PDFObject) -> Result<()> {
        let properties = match properties {
            PDFObject::Dict(dict) => Some(dict.clone()),
            PDFObject::Name(name) => match self.resources().properties(name) {
                Ok(Some(dict)) => Some(dict),
                Ok(None) => {
                    self.recover("BDC", format!("property list /{name} not found"))?;
                    None
                }
                Err(e) => {
                    self.recover("BDC", format!("property list /{name}: {e}"))?;
                    None
                }
            },
            other => {
                let got = other.type_name();
                self.recover("BDC", format!("properties must be a dict or name, got {got}"))?;
                None
            }
        };
        let at = self.counts();
        self.marked.begin(tag.to_string(), properties, at);
        Ok(())
    }

    /// End the innermost marked-content sequence.
    ///
    /// PDF operator: `EMC`
    pub(crate) fn do_EMC(&mut self) -> Result<()> {
        let at = self.counts();
        if self.marked.end(at) {
            Ok(())
        } else {
            self.recover("EMC", "no open marked-content sequence")
        }
    }
}

fn parse_matrix(items: &[PDFObject]) -> Option<Matrix> {
    let n: Vec<f64> = items.iter().filter_map(|v| v.as_num().ok()).collect();
    match n[..] {
        [a, b, c, d, e, f] => Some((a, b, c, d, e, f)),
        _ => None,
    }
}
