//! PDF object types.

use crate::codec::ascii85::asciihexdecode;
use crate::error::{PdfError, Result};
use bytes::Bytes;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// PDF Object types - the fundamental value type in PDF.
#[derive(Debug, Clone, PartialEq)]
pub enum PDFObject {
    /// Null object
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Real (floating point) value
    Real(f64),
    /// Name object (e.g., /Type, /Font)
    Name(String),
    /// Literal string, escapes already resolved
    String(Vec<u8>),
    /// Hexadecimal string, holding the digits between `<` and `>` as written
    HexString(Vec<u8>),
    /// Array of objects
    Array(Vec<Self>),
    /// Dictionary (name -> object mapping)
    Dict(HashMap<String, Self>),
    /// Stream (dictionary + binary data)
    Stream(Box<PDFStream>),
    /// Indirect object reference
    Ref(PDFObjRef),
}

impl PDFObject {
    /// Check if this is a null object
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get as boolean
    pub const fn as_bool(&self) -> Result<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            _ => Err(PdfError::TypeError {
                expected: "bool",
                got: self.type_name(),
            }),
        }
    }

    /// Get as integer
    pub const fn as_int(&self) -> Result<i64> {
        match self {
            Self::Int(n) => Ok(*n),
            _ => Err(PdfError::TypeError {
                expected: "int",
                got: self.type_name(),
            }),
        }
    }

    /// Get numeric value (int or real coerced to f64)
    pub const fn as_num(&self) -> Result<f64> {
        match self {
            Self::Int(n) => Ok(*n as f64),
            Self::Real(n) => Ok(*n),
            _ => Err(PdfError::TypeError {
                expected: "number",
                got: self.type_name(),
            }),
        }
    }

    /// Get as name string
    pub fn as_name(&self) -> Result<&str> {
        match self {
            Self::Name(s) => Ok(s),
            _ => Err(PdfError::TypeError {
                expected: "name",
                got: self.type_name(),
            }),
        }
    }

    /// Get the bytes of a string object.
    ///
    /// Literal and hexadecimal strings normalize to the same byte sequence:
    /// `(AB)` and `<4142>` both yield `b"AB"`.
    pub fn string_bytes(&self) -> Result<Cow<'_, [u8]>> {
        match self {
            Self::String(s) => Ok(Cow::Borrowed(s)),
            Self::HexString(digits) => Ok(Cow::Owned(asciihexdecode(digits)?)),
            _ => Err(PdfError::TypeError {
                expected: "string",
                got: self.type_name(),
            }),
        }
    }

    /// Get as array
    pub const fn as_array(&self) -> Result<&Vec<Self>> {
        match self {
            Self::Array(arr) => Ok(arr),
            _ => Err(PdfError::TypeError {
                expected: "array",
                got: self.type_name(),
            }),
        }
    }

    /// Get as dictionary
    pub const fn as_dict(&self) -> Result<&HashMap<String, Self>> {
        match self {
            Self::Dict(d) => Ok(d),
            _ => Err(PdfError::TypeError {
                expected: "dict",
                got: self.type_name(),
            }),
        }
    }

    /// Get as stream
    pub fn as_stream(&self) -> Result<&PDFStream> {
        match self {
            Self::Stream(s) => Ok(s),
            _ => Err(PdfError::TypeError {
                expected: "stream",
                got: self.type_name(),
            }),
        }
    }

    /// Get as object reference
    pub const fn as_ref(&self) -> Result<&PDFObjRef> {
        match self {
            Self::Ref(r) => Ok(r),
            _ => Err(PdfError::TypeError {
                expected: "ref",
                got: self.type_name(),
            }),
        }
    }

    /// Get type name for error messages
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Real(_) => "real",
            Self::Name(_) => "name",
            Self::String(_) => "string",
            Self::HexString(_) => "hexstring",
            Self::Array(_) => "array",
            Self::Dict(_) => "dict",
            Self::Stream(_) => "stream",
            Self::Ref(_) => "ref",
        }
    }
}

/// PDF indirect object reference: the identity key of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PDFObjRef {
    /// Object number
    pub objid: u64,
    /// Generation number
    pub genno: u32,
}

impl PDFObjRef {
    /// Create a new object reference.
    pub const fn new(objid: u64, genno: u32) -> Self {
        Self { objid, genno }
    }
}

impl fmt::Display for PDFObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.objid, self.genno)
    }
}

/// PDF Stream - dictionary attributes + raw (still filtered) data.
#[derive(Debug, Clone, PartialEq)]
pub struct PDFStream {
    /// Stream dictionary attributes
    pub attrs: HashMap<String, PDFObject>,
    /// Raw (possibly encoded) data
    rawdata: Bytes,
    /// Reference the stream was loaded from, when known
    pub reference: Option<PDFObjRef>,
}

impl PDFStream {
    /// Create a new stream.
    pub fn new(attrs: HashMap<String, PDFObject>, rawdata: impl Into<Bytes>) -> Self {
        Self {
            attrs,
            rawdata: rawdata.into(),
            reference: None,
        }
    }

    /// Attach the reference the stream was loaded from.
    pub fn with_reference(mut self, reference: PDFObjRef) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Get raw (undecoded) data.
    pub fn get_rawdata(&self) -> &[u8] {
        self.rawdata.as_ref()
    }

    /// Get raw data as shared bytes.
    pub fn rawdata_bytes(&self) -> Bytes {
        self.rawdata.clone()
    }

    /// Check if stream contains a key.
    pub fn contains(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Get attribute by name.
    pub fn get(&self, name: &str) -> Option<&PDFObject> {
        self.attrs.get(name)
    }

    /// Get attribute, trying multiple names.
    pub fn get_any(&self, names: &[&str]) -> Option<&PDFObject> {
        names.iter().find_map(|name| self.attrs.get(*name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_and_literal_strings_normalize_identically() {
        let literal = PDFObject::String(b"AB\x00\xff".to_vec());
        let hex = PDFObject::HexString(b"4142 00FF".to_vec());
        assert_eq!(literal.string_bytes().unwrap(), hex.string_bytes().unwrap());
    }

    #[test]
    fn odd_hex_digit_count_pads_with_zero() {
        let hex = PDFObject::HexString(b"41424".to_vec());
        assert_eq!(hex.string_bytes().unwrap().as_ref(), b"AB@");
    }

    #[test]
    fn objref_display() {
        assert_eq!(PDFObjRef::new(12, 0).to_string(), "12 0 R");
    }

    #[test]
    fn string_bytes_rejects_numbers() {
        assert!(matches!(
            PDFObject::Int(3).string_bytes(),
            Err(PdfError::TypeError { expected: "string", got: "int" })
        ));
    }
}
