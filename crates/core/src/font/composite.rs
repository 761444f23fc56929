//! Type0 (composite) fonts.
//!
//! Codes are read two bytes at a time, which covers `Identity-H`,
//! `Identity-V` and the two-byte predefined CMaps. Code-to-CID mapping is
//! the identity.

use super::tounicode::ToUnicodeMap;
use super::{CharCode, PdfFont, number};
use crate::error::Result;
use crate::model::objects::PDFObject;
use crate::parser::scanner::{TokenScanner, get_resolved};
use rustc_hash::FxHashMap;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct CompositeFont {
    basefont: Option<String>,
    encoding: Option<String>,
    widths: FxHashMap<u32, f64>,
    default_width: f64,
    to_unicode: Option<ToUnicodeMap>,
}

impl CompositeFont {
    pub fn new(
        spec: &HashMap<String, PDFObject>,
        scanner: &dyn TokenScanner,
        to_unicode: Option<ToUnicodeMap>,
    ) -> Result<Self> {
        let basefont = get_resolved(spec, "BaseFont", scanner)?
            .and_then(|v| v.as_name().ok().map(str::to_owned));
        let encoding = get_resolved(spec, "Encoding", scanner)?
            .and_then(|v| v.as_name().ok().map(str::to_owned));

        let descendant = match get_resolved(spec, "DescendantFonts", scanner)? {
            Some(PDFObject::Array(items)) => match items.first() {
                Some(first) => scanner.resolve(first)?.as_dict().ok().cloned(),
                None => None,
            },
            _ => None,
        };

        let mut widths = FxHashMap::default();
        let mut default_width = 1000.0;
        if let Some(cid_font) = &descendant {
            default_width = get_resolved(cid_font, "DW", scanner)?
                .as_ref()
                .and_then(number)
                .unwrap_or(1000.0);
            if let Some(PDFObject::Array(w)) = get_resolved(cid_font, "W", scanner)? {
                let w = w
                    .iter()
                    .map(|item| scanner.resolve(item))
                    .collect::<Result<Vec<_>>>()?;
                widths = get_widths(&w);
            }
        }

        Ok(Self {
            basefont,
            encoding,
            widths,
            default_width,
            to_unicode,
        })
    }

    /// `/Encoding` CMap name, when given as a name.
    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }
}

/// Parse a CIDFont `/W` array into a CID -> width mapping.
///
/// Handles two formats:
/// - `[cid [w1 w2 w3 ...]]` - consecutive widths starting at cid
/// - `[cid_start cid_end width]` - range with same width
pub fn get_widths(seq: &[PDFObject]) -> FxHashMap<u32, f64> {
    let mut widths = FxHashMap::default();
    let mut pending: Vec<f64> = Vec::new();

    for item in seq {
        match item {
            PDFObject::Array(arr) => {
                if let Some(&first) = pending.last() {
                    let first = first as u32;
                    for (i, w) in arr.iter().enumerate() {
                        if let Some(width) = number(w) {
                            widths.insert(first + i as u32, width);
                        }
                    }
                }
                pending.clear();
            }
            other => {
                if let Some(n) = number(other) {
                    pending.push(n);
                    if let [start, end, width] = pending[..] {
                        for cid in (start as u32)..=(end as u32) {
                            widths.insert(cid, width);
                        }
                        pending.clear();
                    }
                }
            }
        }
    }

    widths
}

impl PdfFont for CompositeFont {
    fn fontname(&self) -> Option<&str> {
        self.basefont.as_deref()
    }

    fn decode(&self, data: &[u8]) -> Vec<CharCode> {
        data.chunks(2)
            .map(|pair| match pair {
                [hi, lo] => CharCode {
                    code: u32::from(u16::from_be_bytes([*hi, *lo])),
                    len: 2,
                },
                [single] => CharCode {
                    code: u32::from(*single),
                    len: 1,
                },
                _ => CharCode { code: 0, len: 0 },
            })
            .collect()
    }

    fn to_unichr(&self, code: u32) -> Option<String> {
        self.to_unicode
            .as_ref()
            .and_then(|m| m.get(code))
            .map(str::to_owned)
    }

    fn char_width(&self, code: u32) -> f64 {
        self.widths.get(&code).copied().unwrap_or(self.default_width) * 0.001
    }

    fn is_multibyte(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::scanner::MemoryScanner;

    #[test]
    fn w_array_both_forms() {
        let w = vec![
            PDFObject::Int(1),
            PDFObject::Array(vec![PDFObject::Int(500), PDFObject::Int(600)]),
            PDFObject::Int(10),
            PDFObject::Int(12),
            PDFObject::Int(300),
        ];
        let widths = get_widths(&w);
        assert_eq!(widths.get(&1), Some(&500.0));
        assert_eq!(widths.get(&2), Some(&600.0));
        assert_eq!(widths.get(&11), Some(&300.0));
        assert_eq!(widths.get(&13), None);
    }

    #[test]
    fn two_byte_codes_and_default_width() {
        let mut cid_font = HashMap::new();
        cid_font.insert("DW".to_string(), PDFObject::Int(800));
        let mut spec = HashMap::new();
        spec.insert("Subtype".to_string(), PDFObject::Name("Type0".into()));
        spec.insert("Encoding".to_string(), PDFObject::Name("Identity-H".into()));
        spec.insert(
            "DescendantFonts".to_string(),
            PDFObject::Array(vec![PDFObject::Dict(cid_font)]),
        );

        let font = CompositeFont::new(&spec, &MemoryScanner::new(), None).unwrap();
        let codes = font.decode(&[0x00, 0x41, 0x01, 0x02]);
        assert_eq!(codes.len(), 2);
        assert_eq!(codes[1].code, 0x0102);
        assert!((font.char_width(0x41) - 0.8).abs() < 1e-9);
        assert_eq!(font.encoding(), Some("Identity-H"));
    }
}
