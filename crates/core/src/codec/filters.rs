//! Stream filter pipeline.
//!
//! [`FilterProvider`] is the seam through which image and form streams are
//! decoded. [`StandardFilters`] covers the general-purpose PDF filters;
//! image codecs (DCT, JPX, JBIG2, CCITT) are left to the consumer.

use super::ascii85::{ascii85decode, asciihexdecode};
use crate::error::{PdfError, Result};
use crate::model::objects::{PDFObject, PDFStream};
use flate2::read::ZlibDecoder;
use std::collections::HashMap;
use std::io::Read;
use weezl::{BitOrder, decode::Decoder};

/// Filters whose output is an encoded image rather than raw samples.
pub const IMAGE_CODEC_FILTERS: [&str; 4] =
    ["DCTDecode", "JPXDecode", "JBIG2Decode", "CCITTFaxDecode"];

/// Decodes stream data for a single named filter.
pub trait FilterProvider: Send + Sync {
    /// Apply `filter` to `data`, using the filter's `/DecodeParms` entry.
    fn decode(
        &self,
        filter: &str,
        data: &[u8],
        params: Option<&HashMap<String, PDFObject>>,
    ) -> Result<Vec<u8>>;

    /// Whether `filter` can be decoded by this provider.
    fn supports(&self, filter: &str) -> bool;
}

/// Expand inline-image filter abbreviations to their full names.
pub fn expand_filter_name(name: &str) -> &str {
    match name {
        "AHx" => "ASCIIHexDecode",
        "A85" => "ASCII85Decode",
        "LZW" => "LZWDecode",
        "Fl" => "FlateDecode",
        "RL" => "RunLengthDecode",
        "CCF" => "CCITTFaxDecode",
        "DCT" => "DCTDecode",
        other => other,
    }
}

/// Returns true when `filter` produces an encoded image.
pub fn is_image_codec(filter: &str) -> bool {
    IMAGE_CODEC_FILTERS.contains(&expand_filter_name(filter))
}

/// The general-purpose PDF filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFilters;

impl FilterProvider for StandardFilters {
    fn decode(
        &self,
        filter: &str,
        data: &[u8],
        params: Option<&HashMap<String, PDFObject>>,
    ) -> Result<Vec<u8>> {
        let decoded = match expand_filter_name(filter) {
            "FlateDecode" => flatedecode(data)?,
            "LZWDecode" => {
                let early_change = int_param(params, "EarlyChange", 1);
                lzwdecode_with_earlychange(data, early_change)?
            }
            "ASCIIHexDecode" => return asciihexdecode(data),
            "ASCII85Decode" => return ascii85decode(data),
            "RunLengthDecode" => return rldecode(data),
            other => {
                return Err(PdfError::Decode(format!("unsupported filter /{other}")));
            }
        };
        apply_predictor(decoded, params)
    }

    fn supports(&self, filter: &str) -> bool {
        matches!(
            expand_filter_name(filter),
            "FlateDecode" | "LZWDecode" | "ASCIIHexDecode" | "ASCII85Decode" | "RunLengthDecode"
        )
    }
}

/// Apply every filter of a (non-image) stream.
pub fn decode_stream(stream: &PDFStream, filters: &dyn FilterProvider) -> Result<Vec<u8>> {
    let names: Vec<&str> = match stream.get_any(&["Filter", "F"]) {
        None => Vec::new(),
        Some(PDFObject::Name(name)) => vec![name.as_str()],
        Some(PDFObject::Array(items)) => items.iter().filter_map(|i| i.as_name().ok()).collect(),
        Some(other) => {
            return Err(PdfError::Decode(format!(
                "/Filter must be a name or array, got {}",
                other.type_name()
            )));
        }
    };
    let params: Vec<Option<&HashMap<String, PDFObject>>> =
        match stream.get_any(&["DecodeParms", "DP"]) {
            Some(PDFObject::Dict(d)) => vec![Some(d)],
            Some(PDFObject::Array(items)) => items.iter().map(|i| i.as_dict().ok()).collect(),
            _ => Vec::new(),
        };

    let mut data = stream.get_rawdata().to_vec();
    for (i, name) in names.iter().enumerate() {
        data = filters.decode(name, &data, params.get(i).copied().flatten())?;
    }
    Ok(data)
}

fn int_param(params: Option<&HashMap<String, PDFObject>>, key: &str, default: i64) -> i64 {
    params
        .and_then(|p| p.get(key))
        .and_then(|v| v.as_int().ok())
        .unwrap_or(default)
}

/// Zlib inflate, keeping the partial output of a truncated stream.
pub fn flatedecode(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut decompressed = Vec::new();
    if let Err(err) = decoder.read_to_end(&mut decompressed) {
        if decompressed.is_empty() {
            return Err(PdfError::Decode(format!("FlateDecode: {err}")));
        }
        tracing::debug!(
            produced = decompressed.len(),
            "FlateDecode: keeping partial output of corrupt stream"
        );
    }
    Ok(decompressed)
}

/// Decode LZW-encoded data with EarlyChange setting.
///
/// EarlyChange=1 is the PDF default; EarlyChange=0 uses TIFF size switching.
pub fn lzwdecode_with_earlychange(data: &[u8], early_change: i64) -> Result<Vec<u8>> {
    let mut decoder = if early_change == 0 {
        Decoder::new(BitOrder::Msb, 8)
    } else {
        Decoder::with_tiff_size_switch(BitOrder::Msb, 8)
    };
    let mut output = Vec::new();
    let status = decoder.into_vec(&mut output).decode(data);
    if let Err(err) = status.status {
        if output.is_empty() {
            return Err(PdfError::Decode(format!("LZWDecode: {err}")));
        }
        tracing::debug!(produced = output.len(), "LZWDecode: keeping partial output");
    }
    Ok(output)
}

/// Decode RunLength-encoded data.
///
/// - Length byte 0-127: copy next (length + 1) bytes literally
/// - Length byte 128: end of data
/// - Length byte 129-255: repeat next byte (257 - length) times
///
/// Truncated input stops decoding without error.
pub fn rldecode(data: &[u8]) -> Result<Vec<u8>> {
    let mut result = Vec::new();
    let mut i = 0;

    while i < data.len() {
        let length = data[i];
        i += 1;

        match length {
            128 => break,
            0..=127 => {
                let count = length as usize + 1;
                if i + count > data.len() {
                    break;
                }
                result.extend_from_slice(&data[i..i + count]);
                i += count;
            }
            129..=255 => {
                let Some(&byte) = data.get(i) else {
                    break;
                };
                i += 1;
                result.extend(std::iter::repeat_n(byte, 257 - length as usize));
            }
        }
    }

    Ok(result)
}

fn apply_predictor(
    data: Vec<u8>,
    params: Option<&HashMap<String, PDFObject>>,
) -> Result<Vec<u8>> {
    let predictor = int_param(params, "Predictor", 1);
    if predictor < 10 {
        return Ok(data);
    }
    let columns = predictor_param(params, "Columns", 1)?;
    let colors = predictor_param(params, "Colors", 1)?;
    let bits = predictor_param(params, "BitsPerComponent", 8)?;
    apply_png_predictor(&data, columns, colors, bits)
}

/// A positive `/DecodeParms` entry that fits in 32 bits.
fn predictor_param(
    params: Option<&HashMap<String, PDFObject>>,
    key: &str,
    default: i64,
) -> Result<usize> {
    let value = int_param(params, key, default);
    match u32::try_from(value) {
        Ok(n) if n > 0 => Ok(n as usize),
        _ => Err(PdfError::Decode(format!("invalid predictor /{key} {value}"))),
    }
}

/// Reverse PNG row prediction (one filter-type byte per row).
///
/// A row wider than the whole input is a decode error.
pub fn apply_png_predictor(
    data: &[u8],
    columns: usize,
    colors: usize,
    bits_per_component: usize,
) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    let bits_per_pixel = colors.checked_mul(bits_per_component);
    let row_bytes = bits_per_pixel
        .and_then(|bits| bits.checked_mul(columns))
        .map(|bits| bits.div_ceil(8))
        .filter(|&n| n > 0 && n < data.len())
        .ok_or_else(|| {
            PdfError::Decode(format!(
                "predictor row of {columns} columns x {colors} colors x \
                 {bits_per_component} bits does not fit {} bytes",
                data.len()
            ))
        })?;
    let bpp = std::cmp::max(1, bits_per_pixel.unwrap_or(0) / 8);
    let row_size = row_bytes + 1;

    let mut result = Vec::with_capacity(data.len());
    let mut prev_row = vec![0u8; row_bytes];
    let mut current_row = vec![0u8; row_bytes];

    for row in data.chunks_exact(row_size) {
        let filter_type = row[0];
        let row_data = &row[1..];

        match filter_type {
            1 => {
                for i in 0..row_bytes {
                    let left = if i >= bpp { current_row[i - bpp] } else { 0 };
                    current_row[i] = row_data[i].wrapping_add(left);
                }
            }
            2 => {
                for i in 0..row_bytes {
                    current_row[i] = row_data[i].wrapping_add(prev_row[i]);
                }
            }
            3 => {
                for i in 0..row_bytes {
                    let left = if i >= bpp {
                        u16::from(current_row[i - bpp])
                    } else {
                        0
                    };
                    let above = u16::from(prev_row[i]);
                    current_row[i] = row_data[i].wrapping_add(((left + above) / 2) as u8);
                }
            }
            4 => {
                for i in 0..row_bytes {
                    let left = if i >= bpp { current_row[i - bpp] } else { 0 };
                    let above = prev_row[i];
                    let upper_left = if i >= bpp { prev_row[i - bpp] } else { 0 };
                    current_row[i] =
                        row_data[i].wrapping_add(paeth_predictor(left, above, upper_left));
                }
            }
            // 0 is "None"; unknown types are copied as-is.
            _ => current_row.copy_from_slice(row_data),
        }

        result.extend_from_slice(&current_row);
        std::mem::swap(&mut prev_row, &mut current_row);
    }

    Ok(result)
}

/// Paeth predictor function used in PNG filtering.
const fn paeth_predictor(left: u8, above: u8, upper_left: u8) -> u8 {
    let a = left as i32;
    let b = above as i32;
    let c = upper_left as i32;
    let p = a + b - c;
    let pa = (p - a).abs();
    let pb = (p - b).abs();
    let pc = (p - c).abs();

    if pa <= pb && pa <= pc {
        left
    } else if pb <= pc {
        above
    } else {
        upper_left
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::ZlibEncoder;
    use std::io::Write;

    fn deflate(data: &[u8]) -> Vec<u8> {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn flate_roundtrip_through_provider() {
        let encoded = deflate(b"q 1 0 0 1 0 0 cm Q");
        let out = StandardFilters.decode("FlateDecode", &encoded, None).unwrap();
        assert_eq!(out, b"q 1 0 0 1 0 0 cm Q");
    }

    #[test]
    fn abbreviated_names_are_supported() {
        assert!(StandardFilters.supports("Fl"));
        assert!(StandardFilters.supports("AHx"));
        assert!(!StandardFilters.supports("DCT"));
        assert!(is_image_codec("DCT"));
    }

    #[test]
    fn unsupported_filter_is_decode_error() {
        let err = StandardFilters.decode("JPXDecode", b"", None).unwrap_err();
        assert!(matches!(err, PdfError::Decode(_)));
    }

    #[test]
    fn runlength_literal_and_repeat() {
        let data = [2, b'a', b'b', b'c', 254, b'z', 128];
        assert_eq!(rldecode(&data).unwrap(), b"abczzz");
    }

    #[test]
    fn png_predictor_rejects_rows_wider_than_input() {
        let data = [0, 1, 2, 3];
        assert!(matches!(
            apply_png_predictor(&data, 4, 1, 8),
            Err(PdfError::Decode(_))
        ));
        assert!(apply_png_predictor(&data, usize::MAX, 2, 8).is_err());
        assert_eq!(apply_png_predictor(&[], 3, 1, 8).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn png_up_predictor() {
        // Two rows of 3 bytes, second row uses "Up".
        let data = [0, 1, 2, 3, 2, 1, 1, 1];
        let out = apply_png_predictor(&data, 3, 1, 8).unwrap();
        assert_eq!(out, vec![1, 2, 3, 2, 3, 4]);
    }

    #[test]
    fn flate_with_png_predictor_params() {
        let encoded = deflate(&[0, 10, 20, 2, 1, 1]);
        let mut params = HashMap::new();
        params.insert("Predictor".to_string(), PDFObject::Int(12));
        params.insert("Columns".to_string(), PDFObject::Int(2));
        let out = StandardFilters
            .decode("FlateDecode", &encoded, Some(&params))
            .unwrap();
        assert_eq!(out, vec![10, 20, 11, 21]);
    }
}
