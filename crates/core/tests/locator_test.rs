//! Tests for brute-force object location.

use salvor_core::document::locator::{
    ObjectLocations, ScanOptions, ScanState, find_last_eof_marker, locate_objects,
    locate_objects_with, scan_step,
};
use salvor_core::error::PdfError;
use salvor_core::model::PDFObjRef;
use salvor_core::parser::{ByteCursor, SliceCursor};

fn offset_of(haystack: &[u8], needle: &[u8], nth: usize) -> u64 {
    haystack
        .windows(needle.len())
        .enumerate()
        .filter(|(_, w)| *w == needle)
        .nth(nth)
        .map(|(i, _)| i as u64)
        .expect("needle present")
}

const SIMPLE: &[u8] = b"%PDF-1.7\n\
1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n\
2 0 obj\n<< /Type /Pages /Kids [] /Count 0 >>\nendobj\n\
12 0 obj\n(payload)\nendobj\n\
trailer\n<< /Root 1 0 R >>\n%%EOF\n";

#[test]
fn key_maps_to_first_header_digit() {
    let mut cursor = SliceCursor::new(SIMPLE);
    let locations = locate_objects(&mut cursor).unwrap();

    let expected = offset_of(SIMPLE, b"12 0 obj", 0);
    assert_eq!(locations.get(&PDFObjRef::new(12, 0)), Some(expected));
    assert_ne!(
        locations.get(&PDFObjRef::new(12, 0)),
        Some(offset_of(SIMPLE, b"obj\n(payload)", 0))
    );
    assert_eq!(locations.len(), 3);
    assert_eq!(locations.get(&PDFObjRef::new(1, 0)), Some(9));
}

#[test]
fn repeated_scans_are_identical_and_keep_position() {
    let mut cursor = SliceCursor::new(SIMPLE);
    cursor.seek(17);

    let first = locate_objects(&mut cursor).unwrap();
    assert_eq!(cursor.offset(), 17);
    let second = locate_objects(&mut cursor).unwrap();
    assert_eq!(cursor.offset(), 17);

    assert_eq!(first, second);
}

#[test]
fn later_header_for_same_object_wins() {
    let data: &[u8] = b"%PDF-1.4\n\
4 0 obj\n(original)\nendobj\n\
xref\n0 1\ntrailer\n<<>>\n\
4 0 obj\n(updated)\nendobj\n\
%%EOF\n";
    let mut cursor = SliceCursor::new(data);
    let locations = locate_objects(&mut cursor).unwrap();

    assert_eq!(locations.len(), 1);
    assert_eq!(
        locations.get(&PDFObjRef::new(4, 0)),
        Some(offset_of(data, b"4 0 obj", 1))
    );
}

#[test]
fn generation_numbers_are_part_of_the_key() {
    let data: &[u8] = b"%PDF-1.4\n7 0 obj\nnull\nendobj\n7 3 obj\nnull\nendobj\n%%EOF";
    let mut cursor = SliceCursor::new(data);
    let locations = locate_objects(&mut cursor).unwrap();

    assert!(locations.contains(&PDFObjRef::new(7, 0)));
    assert!(locations.contains(&PDFObjRef::new(7, 3)));
    assert_eq!(
        locations.sorted_by_offset(),
        vec![
            (PDFObjRef::new(7, 0), offset_of(data, b"7 0 obj", 0)),
            (PDFObjRef::new(7, 3), offset_of(data, b"7 3 obj", 0)),
        ]
    );
}

#[test]
fn objects_after_last_eof_are_ignored() {
    let data: &[u8] = b"%PDF-1.7\n1 0 obj\n<<>>\nendobj\n%%EOF\n5 0 obj\n<<>>\nendobj\n";
    let mut cursor = SliceCursor::new(data);
    let locations = locate_objects(&mut cursor).unwrap();

    assert!(locations.contains(&PDFObjRef::new(1, 0)));
    assert!(!locations.contains(&PDFObjRef::new(5, 0)));
}

#[test]
fn whole_input_is_scanned_without_eof_marker() {
    let data: &[u8] = b"%PDF-1.7\n1 0 obj\n<<>>\nendobj\n2 0 obj\n<<>>\nendobj";
    let mut cursor = SliceCursor::new(data);
    assert_eq!(find_last_eof_marker(&mut cursor), None);

    let locations = locate_objects(&mut cursor).unwrap();
    assert_eq!(locations.len(), 2);
}

#[test]
fn obj_inside_stream_data_is_not_a_header() {
    let data: &[u8] = b"%PDF-1.7\n3 0 obj\n<< /Length 12 >>\nstream\n9 9 obj junk\nendstream\nendobj\n%%EOF";
    let mut cursor = SliceCursor::new(data);
    let locations = locate_objects(&mut cursor).unwrap();

    assert_eq!(locations.len(), 1);
    assert!(!locations.contains(&PDFObjRef::new(9, 9)));
}

#[test]
fn guard_fires_under_small_cap_and_restores_cursor() {
    let mut data = b"%PDF-1.7\n".to_vec();
    data.extend(std::iter::repeat_n(b'x', 64));
    let mut cursor = SliceCursor::new(data);
    cursor.seek(3);

    let options = ScanOptions {
        max_unproductive_steps: 10,
        ..ScanOptions::default()
    };
    let err = locate_objects_with(&mut cursor, &options).unwrap_err();

    match err {
        PdfError::NonTermination { steps, .. } => assert_eq!(steps, 11),
        other => panic!("expected NonTermination, got {other:?}"),
    }
    assert_eq!(cursor.offset(), 3);
}

#[test]
fn minimum_offset_excludes_early_headers() {
    let data: &[u8] = b"1 0 obj endobj 2 0 obj endobj %%EOF";
    let mut cursor = SliceCursor::new(data);
    let options = ScanOptions {
        minimum_offset: 8,
        ..ScanOptions::default()
    };
    let locations = locate_objects_with(&mut cursor, &options).unwrap();

    assert!(!locations.contains(&PDFObjRef::new(1, 0)));
    assert_eq!(locations.get(&PDFObjRef::new(2, 0)), Some(15));
}

#[test]
fn header_match_resets_step_counter() {
    let data: &[u8] = b"%PDF-1.7\n5 0 obj";
    let mut cursor = SliceCursor::new(data);
    let keyword = offset_of(data, b" obj", 0);
    cursor.seek(keyword);

    let options = ScanOptions::default();
    let t = scan_step(&mut cursor, ScanState::ScanningForHeader, 40, &options).unwrap();

    assert_eq!(t.state, ScanState::InsideObject);
    assert_eq!(t.steps, 0);
    assert_eq!(t.found, Some((PDFObjRef::new(5, 0), 9)));
    assert_eq!(cursor.offset(), keyword + 1);
}

#[test]
fn non_matching_byte_is_unproductive() {
    let mut cursor = SliceCursor::new(b"abc".as_slice());
    let options = ScanOptions::default();
    let t = scan_step(&mut cursor, ScanState::ScanningForHeader, 2, &options).unwrap();

    assert_eq!(t.state, ScanState::ScanningForHeader);
    assert_eq!(t.steps, 3);
    assert_eq!(t.found, None);
    assert_eq!(cursor.offset(), 1);
}

#[test]
fn empty_input_has_no_objects() {
    let mut cursor = SliceCursor::new(Vec::<u8>::new());
    assert_eq!(locate_objects(&mut cursor).unwrap(), ObjectLocations::new());
}
