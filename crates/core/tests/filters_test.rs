//! Tests for stream filters and the standard filter pipeline.

use flate2::Compression;
use flate2::write::ZlibEncoder;
use salvor_core::codec::{
    FilterProvider, StandardFilters, ascii85decode, asciihexdecode, decode_stream,
    is_image_codec, lzwdecode_with_earlychange, rldecode,
};
use salvor_core::error::PdfError;
use salvor_core::model::{PDFObject, PDFStream};
use std::collections::HashMap;
use std::io::Write;

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

fn stream(entries: Vec<(&str, PDFObject)>, data: Vec<u8>) -> PDFStream {
    PDFStream::new(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        data,
    )
}

#[test]
fn ascii85_wikipedia_sample() {
    assert_eq!(
        ascii85decode(b"9jqo^BlbD-BleB1DJ+*+F(f,q").unwrap(),
        b"Man is distinguished"
    );
}

#[test]
fn ascii85_markers_and_z_groups() {
    assert_eq!(ascii85decode(b"E,9)oF*2M7/c~>").unwrap(), b"pleasure.");
    assert_eq!(ascii85decode(b"E,9)oF*2M7/c").unwrap(), b"pleasure.");
    assert_eq!(ascii85decode(b"<~E,9)oF*2M7/c~\n>").unwrap(), b"pleasure.");
    assert_eq!(
        ascii85decode(b"zE,9)oF*2M7/c~>").unwrap(),
        b"\0\0\0\0pleasure."
    );
    assert_eq!(
        ascii85decode(b"<^BVT:K:=9<E)pd;BS_1:/aSV;ag~>").unwrap(),
        b"VARIOUS UTTER NONSENSE"
    );
}

#[test]
fn ascii_hex_whitespace_and_odd_digits() {
    assert_eq!(asciihexdecode(b"61 62 2e6364   65").unwrap(), b"ab.cde");
    assert_eq!(asciihexdecode(b"61 62 2e6364   657>").unwrap(), b"ab.cdep");
    assert_eq!(asciihexdecode(b"7>").unwrap(), b"p");
}

#[test]
fn lzw_sample() {
    let input = b"\x80\x0b\x60\x50\x22\x0c\x0c\x85\x01";
    assert_eq!(
        lzwdecode_with_earlychange(input, 1).unwrap(),
        b"\x2d\x2d\x2d\x2d\x2d\x41\x2d\x2d\x2d\x42"
    );
}

#[test]
fn run_length_literal_and_repeat() {
    assert_eq!(rldecode(&[2, b'a', b'b', b'c', 254, b'z', 128]).unwrap(), b"abczzz");
    // Truncated literal run stops quietly.
    assert_eq!(rldecode(&[3, b'x']).unwrap(), b"");
}

#[test]
fn flate_through_the_provider() {
    let data = deflate(b"BT /F1 12 Tf (Hello) Tj ET");
    let out = StandardFilters.decode("Fl", &data, None).unwrap();
    assert_eq!(out, b"BT /F1 12 Tf (Hello) Tj ET");
}

#[test]
fn corrupt_flate_is_a_decode_error() {
    let err = StandardFilters
        .decode("FlateDecode", b"not zlib at all", None)
        .unwrap_err();
    assert!(matches!(err, PdfError::Decode(_)));
}

#[test]
fn filter_chain_applies_in_order() {
    let hex = hex::encode(deflate(b"0 0 m 10 10 l S")).into_bytes();
    let s = stream(
        vec![(
            "Filter",
            PDFObject::Array(vec![
                PDFObject::Name("ASCIIHexDecode".into()),
                PDFObject::Name("FlateDecode".into()),
            ]),
        )],
        hex,
    );
    assert_eq!(decode_stream(&s, &StandardFilters).unwrap(), b"0 0 m 10 10 l S");
}

#[test]
fn png_up_predictor_is_reversed() {
    // Two rows of three bytes, PNG "Up" filter on the second row.
    let raw = [0u8, 1, 2, 3, 2, 1, 1, 1];
    let params: HashMap<String, PDFObject> = [
        ("Predictor".to_string(), PDFObject::Int(12)),
        ("Columns".to_string(), PDFObject::Int(3)),
    ]
    .into_iter()
    .collect();
    let s = stream(
        vec![
            ("Filter", PDFObject::Name("FlateDecode".into())),
            ("DecodeParms", PDFObject::Dict(params)),
        ],
        deflate(&raw),
    );
    assert_eq!(decode_stream(&s, &StandardFilters).unwrap(), [1, 2, 3, 2, 3, 4]);
}

#[test]
fn malformed_predictor_parameters_are_decode_errors() {
    let data = deflate(&[0; 8]);
    for (columns, colors) in [(i64::MAX, 4), (17_179_869_184, 1), (0, 1), (4, -3), (1_000, 1)] {
        let params: HashMap<String, PDFObject> = [
            ("Predictor".to_string(), PDFObject::Int(12)),
            ("Columns".to_string(), PDFObject::Int(columns)),
            ("Colors".to_string(), PDFObject::Int(colors)),
        ]
        .into_iter()
        .collect();
        let result = StandardFilters.decode("FlateDecode", &data, Some(&params));
        assert!(
            matches!(result, Err(PdfError::Decode(_))),
            "Columns {columns} Colors {colors}: {result:?}"
        );
    }
}

#[test]
fn unfiltered_stream_is_returned_as_is() {
    let s = stream(vec![], b"raw bytes".to_vec());
    assert_eq!(decode_stream(&s, &StandardFilters).unwrap(), b"raw bytes");
}

#[test]
fn image_codecs_are_not_standard_filters() {
    assert!(is_image_codec("DCT"));
    assert!(is_image_codec("JPXDecode"));
    assert!(!is_image_codec("FlateDecode"));
    assert!(!StandardFilters.supports("DCTDecode"));
    assert!(StandardFilters.supports("A85"));

    let s = stream(
        vec![("Filter", PDFObject::Name("JBIG2Decode".into()))],
        vec![0; 4],
    );
    assert!(matches!(
        decode_stream(&s, &StandardFilters),
        Err(PdfError::Decode(_))
    ));
}
