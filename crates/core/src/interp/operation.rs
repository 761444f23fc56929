//! Content stream operations.
//!
//! A page's content stream is a sequence of operands followed by an
//! operator keyword. [`GraphicsStateOperation`] is one such instruction
//! with its operands already typed; the ordered list of them is the tape
//! the replay runs over.

use crate::error::{PdfError, Result};
use crate::model::objects::PDFObject;
use crate::utils::Matrix;
use bytes::Bytes;
use std::collections::HashMap;

/// One element of a `TJ` array.
#[derive(Debug, Clone, PartialEq)]
pub enum TextSeqItem {
    /// Horizontal adjustment in thousandths of text space (subtracted).
    Number(f64),
    /// String to show.
    Bytes(Vec<u8>),
}

/// A single content stream instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphicsStateOperation {
    // Special graphics state
    /// `q`
    Push,
    /// `Q`
    Pop,
    /// `cm`
    ModifyCtm(Matrix),

    // General graphics state
    /// `w`
    SetLineWidth(f64),
    /// `J`
    SetLineCap(i64),
    /// `j`
    SetLineJoin(i64),
    /// `M`
    SetMiterLimit(f64),
    /// `d`
    SetLineDash { array: Vec<f64>, phase: f64 },
    /// `ri`
    SetRenderingIntent(String),
    /// `i`
    SetFlatness(f64),
    /// `gs`
    SetNamedGraphicsState(String),

    // Path construction
    /// `m`
    BeginSubpath { x: f64, y: f64 },
    /// `l`
    AppendLine { x: f64, y: f64 },
    /// `c`
    AppendCurve {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
    },
    /// `v`: first control point is the current point
    AppendCurveInitialReplicated { x2: f64, y2: f64, x3: f64, y3: f64 },
    /// `y`: second control point is the end point
    AppendCurveFinalReplicated { x1: f64, y1: f64, x3: f64, y3: f64 },
    /// `h`
    CloseSubpath,
    /// `re`
    AppendRectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },

    // Path painting
    /// `S`
    StrokePath,
    /// `s`
    CloseAndStrokePath,
    /// `f`
    FillNonZero,
    /// `F` (obsolete spelling of `f`)
    FillNonZeroCompat,
    /// `f*`
    FillEvenOdd,
    /// `B`
    FillStrokeNonZero,
    /// `B*`
    FillStrokeEvenOdd,
    /// `b`
    CloseFillStrokeNonZero,
    /// `b*`
    CloseFillStrokeEvenOdd,
    /// `n`
    EndPath,

    // Clipping
    /// `W`
    ClipNonZero,
    /// `W*`
    ClipEvenOdd,

    // Text objects
    /// `BT`
    BeginText,
    /// `ET`
    EndText,

    // Text state
    /// `Tc`
    SetCharacterSpacing(f64),
    /// `Tw`
    SetWordSpacing(f64),
    /// `Tz`
    SetHorizontalScaling(f64),
    /// `TL`
    SetTextLeading(f64),
    /// `Tf`
    SetFontAndSize { name: String, size: f64 },
    /// `Tr`
    SetTextRenderingMode(i64),
    /// `Ts`
    SetTextRise(f64),

    // Text positioning
    /// `Td`
    MoveToNextLineWithOffset { tx: f64, ty: f64 },
    /// `TD`
    MoveToNextLineWithOffsetSetLeading { tx: f64, ty: f64 },
    /// `Tm`
    SetTextMatrix(Matrix),
    /// `T*`
    MoveToNextLine,

    // Text showing
    /// `Tj`
    ShowText(Vec<u8>),
    /// `TJ`
    ShowTextsWithPositioning(Vec<TextSeqItem>),
    /// `'`
    MoveToNextLineShowText(Vec<u8>),
    /// `"`
    MoveToNextLineShowTextWithSpacing {
        word_spacing: f64,
        char_spacing: f64,
        text: Vec<u8>,
    },

    // Type 3 glyph metrics
    /// `d0`
    SetGlyphWidth { wx: f64, wy: f64 },
    /// `d1`
    SetGlyphWidthAndBoundingBox {
        wx: f64,
        wy: f64,
        llx: f64,
        lly: f64,
        urx: f64,
        ury: f64,
    },

    // Color
    /// `CS`
    SetStrokeColorSpace(String),
    /// `cs`
    SetNonStrokeColorSpace(String),
    /// `SC`
    SetStrokeColor(Vec<f64>),
    /// `SCN`
    SetStrokeColorAdvanced {
        components: Vec<f64>,
        pattern: Option<String>,
    },
    /// `sc`
    SetNonStrokeColor(Vec<f64>),
    /// `scn`
    SetNonStrokeColorAdvanced {
        components: Vec<f64>,
        pattern: Option<String>,
    },
    /// `G`
    SetStrokeGray(f64),
    /// `g`
    SetNonStrokeGray(f64),
    /// `RG`
    SetStrokeRgb(f64, f64, f64),
    /// `rg`
    SetNonStrokeRgb(f64, f64, f64),
    /// `K`
    SetStrokeCmyk(f64, f64, f64, f64),
    /// `k`
    SetNonStrokeCmyk(f64, f64, f64, f64),

    /// `sh`
    PaintShading(String),

    /// `BI` ... `ID` ... `EI`: the image dictionary and the bytes between
    /// `ID` and `EI`.
    InlineImage {
        dict: HashMap<String, PDFObject>,
        data: Bytes,
    },

    /// `Do`
    InvokeXObject(String),

    // Marked content
    /// `MP`
    MarkedContentPoint(String),
    /// `DP`: properties are an inline dictionary or a `/Properties` name
    MarkedContentPointWithProperties { tag: String, properties: PDFObject },
    /// `BMC`
    BeginMarkedContent(String),
    /// `BDC`: properties are an inline dictionary or a `/Properties` name
    BeginMarkedContentWithProperties { tag: String, properties: PDFObject },
    /// `EMC`
    EndMarkedContent,

    // Compatibility
    /// `BX`
    BeginCompatibility,
    /// `EX`
    EndCompatibility,

    /// Any other operator, kept verbatim.
    Unknown {
        operator: String,
        operands: Vec<PDFObject>,
    },
}

/// Typed access to the trailing operands of one operator.
struct Operands<'a> {
    operator: &'a str,
    items: &'a [PDFObject],
}

impl<'a> Operands<'a> {
    /// Keep the last `count` operands; surplus leading operands are ignored.
    fn take(operator: &'a str, operands: &'a [PDFObject], count: usize) -> Result<Self> {
        if operands.len() < count {
            return Err(PdfError::content(
                operator,
                format!("expected {count} operands, got {}", operands.len()),
            ));
        }
        Ok(Self {
            operator,
            items: &operands[operands.len() - count..],
        })
    }

    fn num(&self, i: usize) -> Result<f64> {
        self.items[i].as_num().map_err(|e| self.error(i, e))
    }

    fn int(&self, i: usize) -> Result<i64> {
        match &self.items[i] {
            PDFObject::Int(n) => Ok(*n),
            PDFObject::Real(r) => Ok(*r as i64),
            other => Err(self.error(
                i,
                PdfError::TypeError {
                    expected: "int",
                    got: other.type_name(),
                },
            )),
        }
    }

    fn name(&self, i: usize) -> Result<String> {
        self.items[i]
            .as_name()
            .map(str::to_owned)
            .map_err(|e| self.error(i, e))
    }

    fn bytes(&self, i: usize) -> Result<Vec<u8>> {
        self.items[i]
            .string_bytes()
            .map(|b| b.into_owned())
            .map_err(|e| self.error(i, e))
    }

    fn matrix(&self) -> Result<Matrix> {
        Ok((
            self.num(0)?,
            self.num(1)?,
            self.num(2)?,
            self.num(3)?,
            self.num(4)?,
            self.num(5)?,
        ))
    }

    fn error(&self, i: usize, err: PdfError) -> PdfError {
        PdfError::content(self.operator, format!("operand {i}: {err}"))
    }
}

/// Numeric operands at the tail of a variable-length list.
fn trailing_numbers(operands: &[PDFObject]) -> Vec<f64> {
    let start = operands
        .iter()
        .rposition(|o| o.as_num().is_err())
        .map_or(0, |p| p + 1);
    operands[start..]
        .iter()
        .filter_map(|o| o.as_num().ok())
        .collect()
}

/// Components and optional trailing pattern name of `SCN` / `scn`.
fn color_advanced(operands: &[PDFObject]) -> (Vec<f64>, Option<String>) {
    match operands.split_last() {
        Some((PDFObject::Name(pattern), rest)) => (trailing_numbers(rest), Some(pattern.clone())),
        _ => (trailing_numbers(operands), None),
    }
}

impl GraphicsStateOperation {
    /// Build an operation from its keyword and operand objects.
    ///
    /// Only the trailing operands an operator needs are consumed. Unknown
    /// keywords become [`GraphicsStateOperation::Unknown`]; missing or
    /// ill-typed operands for a known keyword are a content error. Inline
    /// images carry binary data and are built directly as
    /// [`GraphicsStateOperation::InlineImage`].
    pub fn from_operands(operator: &str, operands: &[PDFObject]) -> Result<Self> {
        use GraphicsStateOperation as Op;
        let take = |n| Operands::take(operator, operands, n);

        let op = match operator {
            "q" => Op::Push,
            "Q" => Op::Pop,
            "cm" => Op::ModifyCtm(take(6)?.matrix()?),
            "w" => Op::SetLineWidth(take(1)?.num(0)?),
            "J" => Op::SetLineCap(take(1)?.int(0)?),
            "j" => Op::SetLineJoin(take(1)?.int(0)?),
            "M" => Op::SetMiterLimit(take(1)?.num(0)?),
            "d" => {
                let o = take(2)?;
                let array = match &o.items[0] {
                    PDFObject::Array(items) => {
                        items.iter().filter_map(|v| v.as_num().ok()).collect()
                    }
                    other => {
                        return Err(o.error(
                            0,
                            PdfError::TypeError {
                                expected: "array",
                                got: other.type_name(),
                            },
                        ));
                    }
                };
                Op::SetLineDash {
                    array,
                    phase: o.num(1)?,
                }
            }
            "ri" => Op::SetRenderingIntent(take(1)?.name(0)?),
            "i" => Op::SetFlatness(take(1)?.num(0)?),
            "gs" => Op::SetNamedGraphicsState(take(1)?.name(0)?),

            "m" => {
                let o = take(2)?;
                Op::BeginSubpath {
                    x: o.num(0)?,
                    y: o.num(1)?,
                }
            }
            "l" => {
                let o = take(2)?;
                Op::AppendLine {
                    x: o.num(0)?,
                    y: o.num(1)?,
                }
            }
            "c" => {
                let o = take(6)?;
                Op::AppendCurve {
                    x1: o.num(0)?,
                    y1: o.num(1)?,
                    x2: o.num(2)?,
                    y2: o.num(3)?,
                    x3: o.num(4)?,
                    y3: o.num(5)?,
                }
            }
            "v" => {
                let o = take(4)?;
                Op::AppendCurveInitialReplicated {
                    x2: o.num(0)?,
                    y2: o.num(1)?,
                    x3: o.num(2)?,
                    y3: o.num(3)?,
                }
            }
            "y" => {
                let o = take(4)?;
                Op::AppendCurveFinalReplicated {
                    x1: o.num(0)?,
                    y1: o.num(1)?,
                    x3: o.num(2)?,
                    y3: o.num(3)?,
                }
            }
            "h" => Op::CloseSubpath,
            "re" => {
                let o = take(4)?;
                Op::AppendRectangle {
                    x: o.num(0)?,
                    y: o.num(1)?,
                    width: o.num(2)?,
                    height: o.num(3)?,
                }
            }

            "S" => Op::StrokePath,
            "s" => Op::CloseAndStrokePath,
            "f" => Op::FillNonZero,
            "F" => Op::FillNonZeroCompat,
            "f*" => Op::FillEvenOdd,
            "B" => Op::FillStrokeNonZero,
            "B*" => Op::FillStrokeEvenOdd,
            "b" => Op::CloseFillStrokeNonZero,
            "b*" => Op::CloseFillStrokeEvenOdd,
            "n" => Op::EndPath,
            "W" => Op::ClipNonZero,
            "W*" => Op::ClipEvenOdd,

            "BT" => Op::BeginText,
            "ET" => Op::EndText,
            "Tc" => Op::SetCharacterSpacing(take(1)?.num(0)?),
            "Tw" => Op::SetWordSpacing(take(1)?.num(0)?),
            "Tz" => Op::SetHorizontalScaling(take(1)?.num(0)?),
            "TL" => Op::SetTextLeading(take(1)?.num(0)?),
            "Tf" => {
                let o = take(2)?;
                Op::SetFontAndSize {
                    name: o.name(0)?,
                    size: o.num(1)?,
                }
            }
            "Tr" => Op::SetTextRenderingMode(take(1)?.int(0)?),
            "Ts" => Op::SetTextRise(take(1)?.num(0)?),
            "Td" => {
                let o = take(2)?;
                Op::MoveToNextLineWithOffset {
                    tx: o.num(0)?,
                    ty: o.num(1)?,
                }
            }
            "TD" => {
                let o = take(2)?;
                Op::MoveToNextLineWithOffsetSetLeading {
                    tx: o.num(0)?,
                    ty: o.num(1)?,
                }
            }
            "Tm" => Op::SetTextMatrix(take(6)?.matrix()?),
            "T*" => Op::MoveToNextLine,
            "Tj" => Op::ShowText(take(1)?.bytes(0)?),
            "TJ" => {
                let o = take(1)?;
                let PDFObject::Array(items) = &o.items[0] else {
                    return Err(o.error(
                        0,
                        PdfError::TypeError {
                            expected: "array",
                            got: o.items[0].type_name(),
                        },
                    ));
                };
                let seq = items
                    .iter()
                    .filter_map(|item| match item {
                        PDFObject::Int(_) | PDFObject::Real(_) => {
                            item.as_num().ok().map(TextSeqItem::Number)
                        }
                        PDFObject::String(_) | PDFObject::HexString(_) => item
                            .string_bytes()
                            .ok()
                            .map(|b| TextSeqItem::Bytes(b.into_owned())),
                        _ => None,
                    })
                    .collect();
                Op::ShowTextsWithPositioning(seq)
            }
            "'" => Op::MoveToNextLineShowText(take(1)?.bytes(0)?),
            "\"" => {
                let o = take(3)?;
                Op::MoveToNextLineShowTextWithSpacing {
                    word_spacing: o.num(0)?,
                    char_spacing: o.num(1)?,
                    text: o.bytes(2)?,
                }
            }

            "d0" => {
                let o = take(2)?;
                Op::SetGlyphWidth {
                    wx: o.num(0)?,
                    wy: o.num(1)?,
                }
            }
            "d1" => {
                let o = take(6)?;
                Op::SetGlyphWidthAndBoundingBox {
                    wx: o.num(0)?,
                    wy: o.num(1)?,
                    llx: o.num(2)?,
                    lly: o.num(3)?,
                    urx: o.num(4)?,
                    ury: o.num(5)?,
                }
            }

            "CS" => Op::SetStrokeColorSpace(take(1)?.name(0)?),
            "cs" => Op::SetNonStrokeColorSpace(take(1)?.name(0)?),
            "SC" => Op::SetStrokeColor(trailing_numbers(operands)),
            "sc" => Op::SetNonStrokeColor(trailing_numbers(operands)),
            "SCN" => {
                let (components, pattern) = color_advanced(operands);
                Op::SetStrokeColorAdvanced {
                    components,
                    pattern,
                }
            }
            "scn" => {
                let (components, pattern) = color_advanced(operands);
                Op::SetNonStrokeColorAdvanced {
                    components,
                    pattern,
                }
            }
            "G" => Op::SetStrokeGray(take(1)?.num(0)?),
            "g" => Op::SetNonStrokeGray(take(1)?.num(0)?),
            "RG" => {
                let o = take(3)?;
                Op::SetStrokeRgb(o.num(0)?, o.num(1)?, o.num(2)?)
            }
            "rg" => {
                let o = take(3)?;
                Op::SetNonStrokeRgb(o.num(0)?, o.num(1)?, o.num(2)?)
            }
            "K" => {
                let o = take(4)?;
                Op::SetStrokeCmyk(o.num(0)?, o.num(1)?, o.num(2)?, o.num(3)?)
            }
            "k" => {
                let o = take(4)?;
                Op::SetNonStrokeCmyk(o.num(0)?, o.num(1)?, o.num(2)?, o.num(3)?)
            }

            "sh" => Op::PaintShading(take(1)?.name(0)?),
            "Do" => Op::InvokeXObject(take(1)?.name(0)?),

            "MP" => Op::MarkedContentPoint(take(1)?.name(0)?),
            "DP" => {
                let o = take(2)?;
                Op::MarkedContentPointWithProperties {
                    tag: o.name(0)?,
                    properties: o.items[1].clone(),
                }
            }
            "BMC" => Op::BeginMarkedContent(take(1)?.name(0)?),
            "BDC" => {
                let o = take(2)?;
                Op::BeginMarkedContentWithProperties {
                    tag: o.name(0)?,
                    properties: o.items[1].clone(),
                }
            }
            "EMC" => Op::EndMarkedContent,
            "BX" => Op::BeginCompatibility,
            "EX" => Op::EndCompatibility,

            "BI" | "ID" | "EI" => {
                return Err(PdfError::content(
                    operator,
                    "inline images are built as InlineImage with their data",
                ));
            }

            other => Op::Unknown {
                operator: other.to_string(),
                operands: operands.to_vec(),
            },
        };
        Ok(op)
    }

    /// The content stream keyword of this operation.
    ///
    /// Inline images report `BI`; unknown operations report an empty
    /// string (see [`GraphicsStateOperation::Unknown`] for the keyword).
    pub fn operator(&self) -> &'static str {
        use GraphicsStateOperation as Op;
        match self {
            Op::Push => "q",
            Op::Pop => "Q",
            Op::ModifyCtm(_) => "cm",
            Op::SetLineWidth(_) => "w",
            Op::SetLineCap(_) => "J",
            Op::SetLineJoin(_) => "j",
            Op::SetMiterLimit(_) => "M",
            Op::SetLineDash { .. } => "d",
            Op::SetRenderingIntent(_) => "ri",
            Op::SetFlatness(_) => "i",
            Op::SetNamedGraphicsState(_) => "gs",
            Op::BeginSubpath { .. } => "m",
            Op::AppendLine { .. } => "l",
            Op::AppendCurve { .. } => "c",
            Op::AppendCurveInitialReplicated { .. } => "v",
            Op::AppendCurveFinalReplicated { .. } => "y",
            Op::CloseSubpath => "h",
            Op::AppendRectangle { .. } => "re",
            Op::StrokePath => "S",
            Op::CloseAndStrokePath => "s",
            Op::FillNonZero => "f",
            Op::FillNonZeroCompat => "F",
            Op::FillEvenOdd => "f*",
            Op::FillStrokeNonZero => "B",
            Op::FillStrokeEvenOdd => "B*",
            Op::CloseFillStrokeNonZero => "b",
            Op::CloseFillStrokeEvenOdd => "b*",
            Op::EndPath => "n",
            Op::ClipNonZero => "W",
            Op::ClipEvenOdd => "W*",
            Op::BeginText => "BT",
            Op::EndText => "ET",
            Op::SetCharacterSpacing(_) => "Tc",
            Op::SetWordSpacing(_) => "Tw",
            Op::SetHorizontalScaling(_) => "Tz",
            Op::SetTextLeading(_) => "TL",
            Op::SetFontAndSize { .. } => "Tf",
            Op::SetTextRenderingMode(_) => "Tr",
            Op::SetTextRise(_) => "Ts",
            Op::MoveToNextLineWithOffset { .. } => "Td",
            Op::MoveToNextLineWithOffsetSetLeading { .. } => "TD",
            Op::SetTextMatrix(_) => "Tm",
            Op::MoveToNextLine => "T*",
            Op::ShowText(_) => "Tj",
            Op::ShowTextsWithPositioning(_) => "TJ",
            Op::MoveToNextLineShowText(_) => "'",
            Op::MoveToNextLineShowTextWithSpacing { .. } => "\"",
            Op::SetGlyphWidth { .. } => "d0",
            Op::SetGlyphWidthAndBoundingBox { .. } => "d1",
            Op::SetStrokeColorSpace(_) => "CS",
            Op::SetNonStrokeColorSpace(_) => "cs",
            Op::SetStrokeColor(_) => "SC",
            Op::SetStrokeColorAdvanced { .. } => "SCN",
            Op::SetNonStrokeColor(_) => "sc",
            Op::SetNonStrokeColorAdvanced { .. } => "scn",
            Op::SetStrokeGray(_) => "G",
            Op::SetNonStrokeGray(_) => "g",
            Op::SetStrokeRgb(..) => "RG",
            Op::SetNonStrokeRgb(..) => "rg",
            Op::SetStrokeCmyk(..) => "K",
            Op::SetNonStrokeCmyk(..) => "k",
            Op::PaintShading(_) => "sh",
            Op::InlineImage { .. } => "BI",
            Op::InvokeXObject(_) => "Do",
            Op::MarkedContentPoint(_) => "MP",
            Op::MarkedContentPointWithProperties { .. } => "DP",
            Op::BeginMarkedContent(_) => "BMC",
            Op::BeginMarkedContentWithProperties { .. } => "BDC",
            Op::EndMarkedContent => "EMC",
            Op::BeginCompatibility => "BX",
            Op::EndCompatibility => "EX",
            Op::Unknown { .. } => "",
        }
    }
}
