//! Tests for font loading from resource dictionaries.

use salvor_core::codec::StandardFilters;
use salvor_core::font::encoding::{BaseEncoding, name2unicode};
use salvor_core::font::tounicode::parse_tounicode_cmap;
use salvor_core::font::load_font;
use salvor_core::model::{PDFObjRef, PDFObject, PDFStream};
use salvor_core::parser::MemoryScanner;
use std::collections::HashMap;

const TO_UNICODE: &[u8] = b"/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
1 begincodespacerange <0000> <FFFF> endcodespacerange
1 beginbfchar
<0001> <0041>
endbfchar
2 beginbfrange
<000A> <000C> <0061>
<0020> <0021> [<00660066> <00660069>]
endbfrange
endcmap
CMapName currentdict /CMap defineresource pop
end
end";

fn name(s: &str) -> PDFObject {
    PDFObject::Name(s.to_string())
}

fn dict(entries: Vec<(&str, PDFObject)>) -> HashMap<String, PDFObject> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[test]
fn tounicode_ranges_and_arrays() {
    let map = parse_tounicode_cmap(TO_UNICODE);
    assert_eq!(map.get(1), Some("A"));
    assert_eq!(map.get(0x0B), Some("b"));
    assert_eq!(map.get(0x0C), Some("c"));
    assert_eq!(map.get(0x20), Some("ff"));
    assert_eq!(map.get(0x21), Some("fi"));
    assert_eq!(map.get(0x0D), None);
    assert_eq!(map.len(), 6);
}

#[test]
fn type0_font_with_indirect_descendant() {
    let descendant = dict(vec![
        ("Type", name("Font")),
        ("Subtype", name("CIDFontType2")),
        ("DW", PDFObject::Int(900)),
        (
            "W",
            PDFObject::Array(vec![
                PDFObject::Int(1),
                PDFObject::Array(vec![PDFObject::Int(500), PDFObject::Int(600)]),
                PDFObject::Int(10),
                PDFObject::Int(12),
                PDFObject::Int(250),
            ]),
        ),
    ]);
    let scanner = MemoryScanner::new()
        .with(8, 0, PDFObject::Dict(descendant))
        .with(
            9,
            0,
            PDFObject::Stream(Box::new(PDFStream::new(HashMap::new(), TO_UNICODE.to_vec()))),
        );
    let font = dict(vec![
        ("Type", name("Font")),
        ("Subtype", name("Type0")),
        ("BaseFont", name("ABCDEF+NotoSans")),
        ("Encoding", name("Identity-H")),
        (
            "DescendantFonts",
            PDFObject::Array(vec![PDFObject::Ref(PDFObjRef::new(8, 0))]),
        ),
        ("ToUnicode", PDFObject::Ref(PDFObjRef::new(9, 0))),
    ]);

    let font = load_font(&font, &scanner, &StandardFilters).unwrap();
    assert!(font.is_multibyte());
    assert_eq!(font.fontname(), Some("ABCDEF+NotoSans"));

    let codes: Vec<u32> = font.decode(b"\x00\x01\x00\x0a\x00\x63").iter().map(|c| c.code).collect();
    assert_eq!(codes, [1, 10, 0x63]);
    assert_eq!(font.to_unichr(1).as_deref(), Some("A"));
    assert_eq!(font.to_unichr(10).as_deref(), Some("a"));
    assert_eq!(font.to_unichr(0x63), None);

    assert_eq!(font.char_width(2), 0.6);
    assert_eq!(font.char_width(11), 0.25);
    assert_eq!(font.char_width(99), 0.9);
}

#[test]
fn simple_font_differences_and_widths() {
    let font = dict(vec![
        ("Type", name("Font")),
        ("Subtype", name("Type1")),
        ("BaseFont", name("Times-Roman")),
        ("FirstChar", PDFObject::Int(65)),
        (
            "Widths",
            PDFObject::Array(vec![PDFObject::Int(722), PDFObject::Int(667)]),
        ),
        (
            "Encoding",
            PDFObject::Dict(dict(vec![
                ("BaseEncoding", name("WinAnsiEncoding")),
                (
                    "Differences",
                    PDFObject::Array(vec![PDFObject::Int(66), name("uni00C5")]),
                ),
            ])),
        ),
        (
            "FontDescriptor",
            PDFObject::Dict(dict(vec![("MissingWidth", PDFObject::Int(250))])),
        ),
    ]);

    let font = load_font(&font, &MemoryScanner::new(), &StandardFilters).unwrap();
    assert!(!font.is_multibyte());
    assert_eq!(font.to_unichr(65).as_deref(), Some("A"));
    assert_eq!(font.to_unichr(66).as_deref(), Some("\u{C5}"));
    assert_eq!(font.char_width(65), 0.722);
    assert_eq!(font.char_width(90), 0.25);
}

#[test]
fn glyph_names() {
    assert_eq!(name2unicode("uni0041").as_deref(), Some("A"));
    assert_eq!(name2unicode("uni00410042").as_deref(), Some("AB"));
    assert_eq!(name2unicode("u1F600").as_deref(), Some("\u{1F600}"));
    assert_eq!(name2unicode("A.sc").as_deref(), Some("A"));
    assert_eq!(name2unicode(".notdef"), None);
}

#[test]
fn base_encodings_differ_on_quotes() {
    assert_eq!(BaseEncoding::Standard.to_char(0x27), Some('\u{2019}'));
    assert_eq!(BaseEncoding::WinAnsi.to_char(0x27), Some('\''));
    assert_eq!(
        BaseEncoding::from_name("MacRomanEncoding"),
        Some(BaseEncoding::MacRoman)
    );
}
