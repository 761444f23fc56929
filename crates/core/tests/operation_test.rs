//! Tests for building operations from parsed operands.

use salvor_core::error::PdfError;
use salvor_core::interp::{GraphicsStateOperation as Op, TextSeqItem};
use salvor_core::model::PDFObject;

fn int(n: i64) -> PDFObject {
    PDFObject::Int(n)
}

fn real(n: f64) -> PDFObject {
    PDFObject::Real(n)
}

fn name(s: &str) -> PDFObject {
    PDFObject::Name(s.to_string())
}

#[test]
fn graphics_state_operators() {
    assert_eq!(Op::from_operands("q", &[]).unwrap(), Op::Push);
    assert_eq!(
        Op::from_operands("cm", &[int(1), int(0), int(0), int(1), real(72.5), int(10)]).unwrap(),
        Op::ModifyCtm((1.0, 0.0, 0.0, 1.0, 72.5, 10.0))
    );
    assert_eq!(
        Op::from_operands("d", &[PDFObject::Array(vec![int(3), int(1)]), int(0)]).unwrap(),
        Op::SetLineDash {
            array: vec![3.0, 1.0],
            phase: 0.0
        }
    );
    assert_eq!(
        Op::from_operands("gs", &[name("GS0")]).unwrap(),
        Op::SetNamedGraphicsState("GS0".into())
    );
}

#[test]
fn text_operators() {
    assert_eq!(
        Op::from_operands("Tf", &[name("F1"), int(12)]).unwrap(),
        Op::SetFontAndSize {
            name: "F1".into(),
            size: 12.0
        }
    );
    assert_eq!(
        Op::from_operands("Tj", &[PDFObject::HexString(b"4869".to_vec())]).unwrap(),
        Op::ShowText(b"Hi".to_vec())
    );
    assert_eq!(
        Op::from_operands("\"", &[int(2), real(0.5), PDFObject::String(b"x".to_vec())]).unwrap(),
        Op::MoveToNextLineShowTextWithSpacing {
            word_spacing: 2.0,
            char_spacing: 0.5,
            text: b"x".to_vec(),
        }
    );
    assert_eq!(Op::from_operands("T*", &[]).unwrap(), Op::MoveToNextLine);
    assert_eq!(
        Op::from_operands("TJ", &[PDFObject::Array(vec![int(-120)])]).unwrap(),
        Op::ShowTextsWithPositioning(vec![TextSeqItem::Number(-120.0)])
    );
}

#[test]
fn color_operators() {
    assert_eq!(
        Op::from_operands("rg", &[real(0.1), real(0.2), real(0.3)]).unwrap(),
        Op::SetNonStrokeRgb(0.1, 0.2, 0.3)
    );
    assert_eq!(
        Op::from_operands("K", &[int(0), int(0), int(0), int(1)]).unwrap(),
        Op::SetStrokeCmyk(0.0, 0.0, 0.0, 1.0)
    );
    assert_eq!(
        Op::from_operands("SCN", &[name("P1")]).unwrap(),
        Op::SetStrokeColorAdvanced {
            components: vec![],
            pattern: Some("P1".into()),
        }
    );
    assert_eq!(
        Op::from_operands("sc", &[real(0.25), real(0.75)]).unwrap(),
        Op::SetNonStrokeColor(vec![0.25, 0.75])
    );
}

#[test]
fn marked_content_and_xobjects() {
    let props = PDFObject::Dict([("MCID".to_string(), int(0))].into_iter().collect());
    assert_eq!(
        Op::from_operands("BDC", &[name("Span"), props.clone()]).unwrap(),
        Op::BeginMarkedContentWithProperties {
            tag: "Span".into(),
            properties: props,
        }
    );
    assert_eq!(Op::from_operands("EMC", &[]).unwrap(), Op::EndMarkedContent);
    assert_eq!(
        Op::from_operands("Do", &[name("Im0")]).unwrap(),
        Op::InvokeXObject("Im0".into())
    );
}

#[test]
fn operator_names_round_trip() {
    for keyword in ["q", "Q", "BT", "ET", "n", "W*", "f*", "B*", "b*", "EMC", "BX", "EX", "h"] {
        let op = Op::from_operands(keyword, &[]).unwrap();
        assert_eq!(op.operator(), keyword);
    }
}

#[test]
fn ill_typed_operands_are_content_errors() {
    let err = Op::from_operands("Tf", &[int(1), int(12)]).unwrap_err();
    assert!(matches!(err, PdfError::Content { ref operator, .. } if operator == "Tf"));

    let err = Op::from_operands("w", &[name("thick")]).unwrap_err();
    assert!(matches!(err, PdfError::Content { .. }));
}

#[test]
fn inline_image_keywords_are_rejected() {
    for keyword in ["BI", "ID", "EI"] {
        assert!(Op::from_operands(keyword, &[]).is_err());
    }
}
