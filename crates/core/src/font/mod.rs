//! Font dictionaries as seen by the content replay.
//!
//! Fonts here split shown strings into character codes, map codes to
//! Unicode and report the advance widths declared in the font dictionary.
//! Glyph programs are never read.
//!
//! - `simple` - single-byte fonts (Type1, TrueType, Type3, MMType1)
//! - `composite` - Type0 fonts with a CID descendant
//! - `tounicode` - `/ToUnicode` CMap parsing
//! - `encoding` - base encodings and glyph names

pub mod composite;
pub mod encoding;
pub mod simple;
pub mod tounicode;

pub use composite::CompositeFont;
pub use simple::SimpleFont;
pub use tounicode::ToUnicodeMap;

use crate::codec::filters::{FilterProvider, decode_stream};
use crate::error::Result;
use crate::model::objects::{PDFObject, PDFStream};
use crate::parser::scanner::{TokenScanner, get_resolved};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// One character code taken from a shown string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharCode {
    pub code: u32,
    /// Number of string bytes the code occupied.
    pub len: usize,
}

/// Font interface used while replaying text operators.
pub trait PdfFont: Debug + Send + Sync {
    /// `/BaseFont`, when present.
    fn fontname(&self) -> Option<&str>;

    /// Split a shown string into character codes.
    fn decode(&self, data: &[u8]) -> Vec<CharCode>;

    /// Unicode text for a character code.
    fn to_unichr(&self, code: u32) -> Option<String>;

    /// Horizontal advance of `code` in text space units (glyph space / 1000).
    fn char_width(&self, code: u32) -> f64;

    /// Whether codes are wider than one byte.
    fn is_multibyte(&self) -> bool {
        false
    }
}

/// Build a font from a `/Font` resource dictionary.
///
/// `/Subtype /Type0` yields a [`CompositeFont`]; every other subtype is
/// read as a [`SimpleFont`].
pub fn load_font(
    dict: &HashMap<String, PDFObject>,
    scanner: &dyn TokenScanner,
    filters: &dyn FilterProvider,
) -> Result<Arc<dyn PdfFont>> {
    let subtype = get_resolved(dict, "Subtype", scanner)?;
    let to_unicode = match get_resolved(dict, "ToUnicode", scanner)? {
        Some(PDFObject::Stream(stream)) => Some(read_tounicode(&stream, filters)?),
        _ => None,
    };

    match subtype.as_ref().and_then(|s| s.as_name().ok()) {
        Some("Type0") => Ok(Arc::new(CompositeFont::new(dict, scanner, to_unicode)?)),
        _ => Ok(Arc::new(SimpleFont::new(dict, scanner, to_unicode)?)),
    }
}

fn read_tounicode(stream: &PDFStream, filters: &dyn FilterProvider) -> Result<ToUnicodeMap> {
    let data = decode_stream(stream, filters)?;
    Ok(tounicode::parse_tounicode_cmap(&data))
}

pub(crate) fn number(obj: &PDFObject) -> Option<f64> {
    obj.as_num().ok()
}
