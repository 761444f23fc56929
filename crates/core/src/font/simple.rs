//! Single-byte fonts: Type1, MMType1, TrueType and Type3.

use super::encoding::{BaseEncoding, name2unicode};
use super::tounicode::ToUnicodeMap;
use super::{CharCode, PdfFont, number};
use crate::error::Result;
use crate::model::objects::PDFObject;
use crate::parser::scanner::{TokenScanner, get_resolved};
use rustc_hash::FxHashMap;
use std::collections::HashMap;

/// A font whose character codes are single bytes.
#[derive(Debug, Clone)]
pub struct SimpleFont {
    basefont: Option<String>,
    widths: FxHashMap<u32, f64>,
    missing_width: f64,
    /// Glyph space to text space factor (1/1000, or `/FontMatrix` for Type3).
    hscale: f64,
    encoding: BaseEncoding,
    differences: FxHashMap<u32, String>,
    to_unicode: Option<ToUnicodeMap>,
}

impl SimpleFont {
    pub fn new(
        spec: &HashMap<String, PDFObject>,
        scanner: &dyn TokenScanner,
        to_unicode: Option<ToUnicodeMap>,
    ) -> Result<Self> {
        let basefont = get_resolved(spec, "BaseFont", scanner)?
            .and_then(|v| v.as_name().ok().map(str::to_owned));

        let first_char = get_resolved(spec, "FirstChar", scanner)?
            .and_then(|v| v.as_int().ok())
            .unwrap_or(0)
            .max(0) as u32;
        let mut widths = FxHashMap::default();
        if let Some(PDFObject::Array(items)) = get_resolved(spec, "Widths", scanner)? {
            for (i, item) in items.iter().enumerate() {
                if let Some(w) = number(&scanner.resolve(item)?) {
                    widths.insert(first_char + i as u32, w);
                }
            }
        }

        let missing_width = match get_resolved(spec, "FontDescriptor", scanner)? {
            Some(PDFObject::Dict(descriptor)) => {
                get_resolved(&descriptor, "MissingWidth", scanner)?
                    .as_ref()
                    .and_then(number)
                    .unwrap_or(0.0)
            }
            _ => 0.0,
        };

        let is_type3 = get_resolved(spec, "Subtype", scanner)?
            .is_some_and(|s| s.as_name().ok() == Some("Type3"));
        let hscale = if is_type3 {
            match get_resolved(spec, "FontMatrix", scanner)? {
                Some(PDFObject::Array(m)) => m.first().and_then(number).unwrap_or(0.001),
                _ => 0.001,
            }
        } else {
            0.001
        };

        let (encoding, differences) = match get_resolved(spec, "Encoding", scanner)? {
            Some(PDFObject::Name(name)) => (
                BaseEncoding::from_name(&name).unwrap_or_default(),
                FxHashMap::default(),
            ),
            Some(PDFObject::Dict(dict)) => read_encoding_dict(&dict, scanner)?,
            _ => (BaseEncoding::default(), FxHashMap::default()),
        };

        Ok(Self {
            basefont,
            widths,
            missing_width,
            hscale,
            encoding,
            differences,
            to_unicode,
        })
    }

    /// A font with explicit widths (in glyph units) and a base encoding.
    pub fn with_widths(
        basefont: &str,
        encoding: BaseEncoding,
        first_char: u32,
        widths: &[f64],
    ) -> Self {
        Self {
            basefont: Some(basefont.to_string()),
            widths: widths
                .iter()
                .enumerate()
                .map(|(i, w)| (first_char + i as u32, *w))
                .collect(),
            missing_width: 0.0,
            hscale: 0.001,
            encoding,
            differences: FxHashMap::default(),
            to_unicode: None,
        }
    }
}

fn read_encoding_dict(
    dict: &HashMap<String, PDFObject>,
    scanner: &dyn TokenScanner,
) -> Result<(BaseEncoding, FxHashMap<u32, String>)> {
    let base = get_resolved(dict, "BaseEncoding", scanner)?
        .and_then(|v| v.as_name().ok().and_then(BaseEncoding::from_name))
        .unwrap_or_default();

    // [code /name1 /name2 ... code /name ...]
    let mut differences = FxHashMap::default();
    if let Some(PDFObject::Array(items)) = get_resolved(dict, "Differences", scanner)? {
        let mut code = 0u32;
        for item in &items {
            match item {
                PDFObject::Int(n) => code = (*n).max(0) as u32,
                PDFObject::Name(name) => {
                    differences.insert(code, name.clone());
                    code += 1;
                }
                _ => {}
            }
        }
    }
    Ok((base, differences))
}

impl PdfFont for SimpleFont {
    fn fontname(&self) -> Option<&str> {
        self.basefont.as_deref()
    }

    fn decode(&self, data: &[u8]) -> Vec<CharCode> {
        data.iter()
            .map(|&b| CharCode {
                code: u32::from(b),
                len: 1,
            })
            .collect()
    }

    fn to_unichr(&self, code: u32) -> Option<String> {
        if let Some(text) = self.to_unicode.as_ref().and_then(|m| m.get(code)) {
            return Some(text.to_string());
        }
        if let Some(name) = self.differences.get(&code) {
            return name2unicode(name);
        }
        let byte = u8::try_from(code).ok()?;
        self.encoding.to_char(byte).map(String::from)
    }

    fn char_width(&self, code: u32) -> f64 {
        self.widths.get(&code).copied().unwrap_or(self.missing_width) * self.hscale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::objects::PDFObjRef;
    use crate::parser::scanner::MemoryScanner;

    fn name(s: &str) -> PDFObject {
        PDFObject::Name(s.to_string())
    }

    #[test]
    fn widths_and_missing_width() {
        let mut descriptor = HashMap::new();
        descriptor.insert("MissingWidth".to_string(), PDFObject::Int(250));
        let scanner = MemoryScanner::new().with(
            7,
            0,
            PDFObject::Array(vec![PDFObject::Int(600), PDFObject::Real(500.0)]),
        );

        let mut spec = HashMap::new();
        spec.insert("BaseFont".to_string(), name("Helvetica"));
        spec.insert("FirstChar".to_string(), PDFObject::Int(65));
        spec.insert("Widths".to_string(), PDFObject::Ref(PDFObjRef::new(7, 0)));
        spec.insert("FontDescriptor".to_string(), PDFObject::Dict(descriptor));

        let font = SimpleFont::new(&spec, &scanner, None).unwrap();
        assert_eq!(font.fontname(), Some("Helvetica"));
        assert!((font.char_width(65) - 0.6).abs() < 1e-9);
        assert!((font.char_width(66) - 0.5).abs() < 1e-9);
        assert!((font.char_width(67) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn differences_override_base_encoding() {
        let mut enc = HashMap::new();
        enc.insert("BaseEncoding".to_string(), name("WinAnsiEncoding"));
        enc.insert(
            "Differences".to_string(),
            PDFObject::Array(vec![PDFObject::Int(65), name("eacute"), name("bullet")]),
        );
        let mut spec = HashMap::new();
        spec.insert("Encoding".to_string(), PDFObject::Dict(enc));

        let font = SimpleFont::new(&spec, &MemoryScanner::new(), None).unwrap();
        assert_eq!(font.to_unichr(65).as_deref(), Some("é"));
        assert_eq!(font.to_unichr(66).as_deref(), Some("\u{2022}"));
        assert_eq!(font.to_unichr(67).as_deref(), Some("C"));
    }
}
