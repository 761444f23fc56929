//! Image occurrences captured while replaying a page.

use super::decode::PdfImage;
use crate::error::{PdfError, Result};
use crate::model::color::PDFColorSpace;
use crate::model::objects::{PDFObjRef, PDFObject, PDFStream};
use crate::model::state::Color;
use crate::utils::{Matrix, Rect, apply_matrix_rect};
use bytes::Bytes;
use std::collections::HashMap;

/// An image XObject painted by `Do`, kept undecoded.
#[derive(Debug, Clone, PartialEq)]
pub struct XObjectContentRecord {
    /// Resource name the image was invoked under.
    pub name: String,
    pub reference: Option<PDFObjRef>,
    pub stream: PDFStream,
    /// CTM at the time of `Do`; maps the unit square onto the page.
    pub transform: Matrix,
    pub rendering_intent: Option<String>,
    /// Non-stroking color and space in effect, which paint stencil masks.
    pub fill_color: Color,
    pub fill_color_space: PDFColorSpace,
    /// Resource scope the image was invoked from (0 is the page).
    pub scope: usize,
}

impl XObjectContentRecord {
    pub fn bounds(&self) -> Rect {
        apply_matrix_rect(self.transform, (0.0, 0.0, 1.0, 1.0))
    }
}

/// An inline image (`BI ... ID ... EI`) captured during replay.
///
/// The image is parsed once, when the operation is replayed. A failure is
/// kept on the record and reported when the page's images are enumerated.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImageRecord {
    /// Image dictionary with abbreviated keys and names expanded.
    pub attrs: HashMap<String, PDFObject>,
    /// Bytes between `ID` and `EI`, before any filter.
    pub data: Bytes,
    pub transform: Matrix,
    pub rendering_intent: Option<String>,
    parsed: std::result::Result<PdfImage, String>,
}

impl InlineImageRecord {
    pub(crate) fn new(
        attrs: HashMap<String, PDFObject>,
        data: Bytes,
        transform: Matrix,
        rendering_intent: Option<String>,
        parsed: Result<PdfImage>,
    ) -> Self {
        Self {
            attrs,
            data,
            transform,
            rendering_intent,
            parsed: parsed.map_err(|e| match e {
                PdfError::Decode(msg) => msg,
                other => other.to_string(),
            }),
        }
    }

    /// The parsed image; `None` when its data could not be decoded.
    pub fn image(&self) -> Option<&PdfImage> {
        self.parsed.as_ref().ok()
    }

    pub fn decode_error(&self) -> Option<&str> {
        self.parsed.as_ref().err().map(String::as_str)
    }

    /// The parsed image, or the failure as [`PdfError::Decode`].
    pub fn to_image(&self) -> Result<PdfImage> {
        self.parsed
            .clone()
            .map_err(|msg| PdfError::Decode(format!("inline image: {msg}")))
    }

    pub fn bounds(&self) -> Rect {
        apply_matrix_rect(self.transform, (0.0, 0.0, 1.0, 1.0))
    }
}

/// An image on the page: either a deferred XObject or an inline image
/// parsed during replay.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageReference {
    XObject(XObjectContentRecord),
    Inline(InlineImageRecord),
}

impl ImageReference {
    pub fn xobject(&self) -> Option<&XObjectContentRecord> {
        match self {
            Self::XObject(record) => Some(record),
            Self::Inline(_) => None,
        }
    }

    pub fn inline(&self) -> Option<&InlineImageRecord> {
        match self {
            Self::Inline(record) => Some(record),
            Self::XObject(_) => None,
        }
    }

    /// Whether producing the image requires reading and decoding a stream.
    pub fn requires_decode(&self) -> bool {
        matches!(self, Self::XObject(_))
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Self::XObject(record) => record.bounds(),
            Self::Inline(record) => record.bounds(),
        }
    }
}
