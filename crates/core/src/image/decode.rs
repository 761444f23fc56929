//! Reading image dictionaries and running their filter chains.

use super::reference::XObjectContentRecord;
use crate::codec::filters::{FilterProvider, expand_filter_name, is_image_codec};
use crate::content::resources::ResourceStore;
use crate::error::{PdfError, Result};
use crate::interp::options::MaskMismatchPolicy;
use crate::model::color::{INLINE_COLORSPACE_ABBREV, PDFColorSpace};
use crate::model::objects::PDFObject;
use crate::parser::scanner::{TokenScanner, get_resolved};
use crate::utils::{Matrix, Rect, apply_matrix_rect};
use bytes::Bytes;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Images whose declared sample data exceeds this are refused.
pub const MAX_IMAGE_DECODED_BYTES: u64 = 256 * 1024 * 1024;

/// Abbreviated inline image keys and their full names.
const INLINE_KEY_ABBREV: [(&str, &str); 10] = [
    ("BPC", "BitsPerComponent"),
    ("CS", "ColorSpace"),
    ("D", "Decode"),
    ("DP", "DecodeParms"),
    ("F", "Filter"),
    ("H", "Height"),
    ("IM", "ImageMask"),
    ("I", "Interpolate"),
    ("W", "Width"),
    ("L", "Length"),
];

/// A decoded image.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfImage {
    /// XObject resource name; `None` for inline images and soft masks.
    pub name: Option<String>,
    pub is_inline: bool,
    pub width: u32,
    pub height: u32,
    pub bits_per_component: u8,
    /// `None` for stencil masks and codec images without `/ColorSpace`.
    pub color_space: Option<PDFColorSpace>,
    pub is_image_mask: bool,
    pub interpolate: bool,
    pub decode: Vec<f64>,
    /// Device-space box of the unit square under `transform`.
    pub bounds: Rect,
    pub transform: Matrix,
    pub rendering_intent: Option<String>,
    /// Input of the terminal image codec, or the stored stream data when
    /// every filter is general purpose.
    pub raw_bytes: Bytes,
    /// Output of the filter chain; `None` when an image codec owns the bytes.
    pub decoded_bytes: Option<Vec<u8>>,
    /// Terminal image codec (`DCTDecode`, `JPXDecode`, ...).
    pub codec: Option<String>,
    pub soft_mask: Option<Box<PdfImage>>,
}

/// Where an image sits on the page.
#[derive(Debug, Clone)]
struct Placement {
    name: Option<String>,
    is_inline: bool,
    transform: Matrix,
    rendering_intent: Option<String>,
}

/// Collaborators needed to turn image dictionaries into [`PdfImage`]s.
pub struct ImageDecoder<'a> {
    pub scanner: &'a dyn TokenScanner,
    pub filters: &'a dyn FilterProvider,
    pub resources: &'a dyn ResourceStore,
    pub mask_policy: MaskMismatchPolicy,
}

impl ImageDecoder<'_> {
    /// Read and decode an image XObject.
    pub fn decode_xobject(&self, record: &XObjectContentRecord) -> Result<PdfImage> {
        debug!(name = %record.name, reference = ?record.reference, "decoding image XObject");
        self.read_image(
            &record.stream.attrs,
            record.stream.rawdata_bytes(),
            Placement {
                name: Some(record.name.clone()),
                is_inline: false,
                transform: record.transform,
                rendering_intent: record.rendering_intent.clone(),
            },
            true,
        )
    }

    /// Decode an inline image from its expanded dictionary (see
    /// [`expand_inline_dict`]) and the bytes between `ID` and `EI`.
    pub fn decode_inline(
        &self,
        attrs: &HashMap<String, PDFObject>,
        data: &Bytes,
        transform: Matrix,
        rendering_intent: Option<String>,
    ) -> Result<PdfImage> {
        self.read_image(
            attrs,
            data.clone(),
            Placement {
                name: None,
                is_inline: true,
                transform,
                rendering_intent,
            },
            false,
        )
    }

    fn read_image(
        &self,
        attrs: &HashMap<String, PDFObject>,
        raw: Bytes,
        place: Placement,
        allow_soft_mask: bool,
    ) -> Result<PdfImage> {
        let width = self.dimension(attrs, "Width")?;
        let height = self.dimension(attrs, "Height")?;
        let is_image_mask = self.flag(attrs, "ImageMask")?;
        let interpolate = self.flag(attrs, "Interpolate")?;

        let chain = self.filter_chain(attrs)?;
        let mut filtered: Option<Vec<u8>> = None;
        let mut codec = None;
        for (i, (filter, params)) in chain.iter().enumerate() {
            if is_image_codec(filter) {
                if i + 1 < chain.len() {
                    debug!(%filter, "filters after an image codec are ignored");
                }
                codec = Some(filter.clone());
                break;
            }
            let input = filtered.as_deref().unwrap_or(&raw[..]);
            filtered = Some(self.filters.decode(filter, input, params.as_ref())?);
        }

        let bits_per_component = if is_image_mask {
            1
        } else {
            match get_resolved(attrs, "BitsPerComponent", self.scanner)?
                .and_then(|v| v.as_int().ok())
            {
                Some(bpc @ 1..=16) => bpc as u8,
                Some(bpc) => {
                    return Err(PdfError::Decode(format!("invalid /BitsPerComponent {bpc}")));
                }
                None if codec.as_deref() == Some("JPXDecode") => 8,
                None => return Err(PdfError::Decode("missing /BitsPerComponent".into())),
            }
        };

        let color_space = match (is_image_mask, attrs.get("ColorSpace")) {
            (false, Some(cs)) => Some(self.resources.resolve_color_space(cs)?),
            _ => None,
        };

        let decode = match get_resolved(attrs, "Decode", self.scanner)? {
            Some(PDFObject::Array(items)) => {
                items.iter().filter_map(|v| v.as_num().ok()).collect()
            }
            _ => Vec::new(),
        };

        let (raw_bytes, decoded_bytes) = match (&codec, filtered) {
            (Some(_), Some(pre)) => (Bytes::from(pre), None),
            (Some(_), None) => (raw, None),
            (None, Some(data)) => (raw, Some(data)),
            (None, None) => {
                let data = raw.to_vec();
                (raw, Some(data))
            }
        };

        if let Some(data) = &decoded_bytes {
            let ncomponents = color_space.as_ref().map_or(1, |cs| cs.ncomponents);
            let expected = expected_len(width, height, ncomponents, bits_per_component)?;
            if (data.len() as u64) < expected {
                warn!(
                    name = ?place.name,
                    expected,
                    got = data.len(),
                    "image data shorter than its dimensions"
                );
            }
        }

        let soft_mask = if allow_soft_mask {
            self.soft_mask(attrs, &place, (width, height))?
        } else {
            None
        };

        Ok(PdfImage {
            name: place.name,
            is_inline: place.is_inline,
            width,
            height,
            bits_per_component,
            color_space,
            is_image_mask,
            interpolate,
            decode,
            bounds: apply_matrix_rect(place.transform, (0.0, 0.0, 1.0, 1.0)),
            transform: place.transform,
            rendering_intent: place.rendering_intent,
            raw_bytes,
            decoded_bytes,
            codec,
            soft_mask,
        })
    }

    fn soft_mask(
        &self,
        attrs: &HashMap<String, PDFObject>,
        place: &Placement,
        size: (u32, u32),
    ) -> Result<Option<Box<PdfImage>>> {
        let Some(PDFObject::Stream(stream)) = get_resolved(attrs, "SMask", self.scanner)? else {
            return Ok(None);
        };
        let mask_place = Placement {
            name: None,
            ..place.clone()
        };
        let mask = self.read_image(&stream.attrs, stream.rawdata_bytes(), mask_place, false)?;
        if (mask.width, mask.height) == size {
            return Ok(Some(Box::new(mask)));
        }
        match self.mask_policy {
            MaskMismatchPolicy::Reject => Err(PdfError::Decode(format!(
                "soft mask is {}x{}, image is {}x{}",
                mask.width, mask.height, size.0, size.1
            ))),
            MaskMismatchPolicy::DropMask => {
                warn!(name = ?place.name, "dropping soft mask with mismatched size");
                Ok(None)
            }
        }
    }

    fn dimension(&self, attrs: &HashMap<String, PDFObject>, key: &str) -> Result<u32> {
        match get_resolved(attrs, key, self.scanner)?.and_then(|v| v.as_num().ok()) {
            Some(n) if n >= 1.0 && n <= f64::from(u32::MAX) => Ok(n as u32),
            Some(n) => Err(PdfError::Decode(format!("invalid image /{key} {n}"))),
            None => Err(PdfError::Decode(format!("missing image /{key}"))),
        }
    }

    fn flag(&self, attrs: &HashMap<String, PDFObject>, key: &str) -> Result<bool> {
        Ok(get_resolved(attrs, key, self.scanner)?
            .and_then(|v| v.as_bool().ok())
            .unwrap_or(false))
    }

    /// `(filter, params)` pairs with abbreviated names expanded.
    fn filter_chain(
        &self,
        attrs: &HashMap<String, PDFObject>,
    ) -> Result<Vec<(String, Option<HashMap<String, PDFObject>>)>> {
        let names: Vec<String> = match get_resolved(attrs, "Filter", self.scanner)? {
            None => Vec::new(),
            Some(PDFObject::Name(name)) => vec![name],
            Some(PDFObject::Array(items)) => {
                let mut names = Vec::with_capacity(items.len());
                for item in &items {
                    match self.scanner.resolve(item)? {
                        PDFObject::Name(name) => names.push(name),
                        other => {
                            return Err(PdfError::Decode(format!(
                                "filter entry must be a name, got {}",
                                other.type_name()
                            )));
                        }
                    }
                }
                names
            }
            Some(other) => {
                return Err(PdfError::Decode(format!(
                    "/Filter must be a name or array, got {}",
                    other.type_name()
                )));
            }
        };

        let mut params: Vec<Option<HashMap<String, PDFObject>>> =
            match get_resolved(attrs, "DecodeParms", self.scanner)? {
                Some(PDFObject::Dict(d)) => vec![Some(d)],
                Some(PDFObject::Array(items)) => items
                    .iter()
                    .map(|i| match self.scanner.resolve(i) {
                        Ok(PDFObject::Dict(d)) => Some(d),
                        _ => None,
                    })
                    .collect(),
                _ => Vec::new(),
            };
        params.resize(names.len(), None);

        Ok(names
            .iter()
            .map(|n| expand_filter_name(n).to_string())
            .zip(params)
            .collect())
    }
}

/// Number of bytes of sample data an image of this shape needs.
fn expected_len(width: u32, height: u32, ncomponents: usize, bpc: u8) -> Result<u64> {
    let bits_per_row = u64::from(width) * ncomponents as u64 * u64::from(bpc);
    let len = bits_per_row.div_ceil(8) * u64::from(height);
    if len > MAX_IMAGE_DECODED_BYTES {
        return Err(PdfError::Decode(format!(
            "image needs {len} bytes, limit is {MAX_IMAGE_DECODED_BYTES}"
        )));
    }
    Ok(len)
}

/// Expand inline image key, filter and color space abbreviations.
pub fn expand_inline_dict(dict: &HashMap<String, PDFObject>) -> HashMap<String, PDFObject> {
    dict.iter()
        .map(|(key, value)| {
            let key = INLINE_KEY_ABBREV
                .iter()
                .find(|(short, _)| *short == key.as_str())
                .map_or(key.as_str(), |(_, full)| *full);
            let value = match key {
                "Filter" => expand_filter_value(value),
                "ColorSpace" => expand_color_space_value(value),
                _ => value.clone(),
            };
            (key.to_string(), value)
        })
        .collect()
}

fn expand_filter_value(value: &PDFObject) -> PDFObject {
    match value {
        PDFObject::Name(name) => PDFObject::Name(expand_filter_name(name).to_string()),
        PDFObject::Array(items) => {
            PDFObject::Array(items.iter().map(expand_filter_value).collect())
        }
        other => other.clone(),
    }
}

fn expand_color_space_value(value: &PDFObject) -> PDFObject {
    match value {
        PDFObject::Name(name) => PDFObject::Name(
            INLINE_COLORSPACE_ABBREV
                .get(name.as_str())
                .map_or_else(|| name.clone(), |full| (*full).to_string()),
        ),
        // [/I /RGB 255 <...>]: family and base may both be abbreviated
        PDFObject::Array(items) => PDFObject::Array(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    if i < 2 {
                        expand_color_space_value(item)
                    } else {
                        item.clone()
                    }
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_abbreviations_expand() {
        let mut dict = HashMap::new();
        dict.insert("W".to_string(), PDFObject::Int(4));
        dict.insert("CS".to_string(), PDFObject::Name("RGB".into()));
        dict.insert(
            "F".to_string(),
            PDFObject::Array(vec![PDFObject::Name("AHx".into()), PDFObject::Name("DCT".into())]),
        );
        dict.insert("Foo".to_string(), PDFObject::Int(1));

        let full = expand_inline_dict(&dict);
        assert_eq!(full.get("Width"), Some(&PDFObject::Int(4)));
        assert_eq!(full.get("ColorSpace"), Some(&PDFObject::Name("DeviceRGB".into())));
        assert_eq!(
            full.get("Filter"),
            Some(&PDFObject::Array(vec![
                PDFObject::Name("ASCIIHexDecode".into()),
                PDFObject::Name("DCTDecode".into()),
            ]))
        );
        assert_eq!(full.get("Foo"), Some(&PDFObject::Int(1)));
    }

    #[test]
    fn indexed_base_expands() {
        let value = PDFObject::Array(vec![
            PDFObject::Name("I".into()),
            PDFObject::Name("G".into()),
            PDFObject::Int(1),
        ]);
        assert_eq!(
            expand_color_space_value(&value),
            PDFObject::Array(vec![
                PDFObject::Name("Indexed".into()),
                PDFObject::Name("DeviceGray".into()),
                PDFObject::Int(1),
            ])
        );
    }

    #[test]
    fn expected_len_rounds_rows() {
        assert_eq!(expected_len(3, 2, 1, 1).unwrap(), 2);
        assert_eq!(expected_len(2, 2, 3, 8).unwrap(), 12);
        assert!(expected_len(100_000, 100_000, 4, 16).is_err());
    }
}
