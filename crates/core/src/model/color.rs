//! PDF color space definitions.

use super::objects::PDFObject;
use crate::error::Result;
use crate::parser::scanner::TokenScanner;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Represents a PDF color space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PDFColorSpace {
    /// Name of the color space family (e.g., "DeviceRGB", "ICCBased")
    pub name: String,
    /// Number of color components
    pub ncomponents: usize,
}

impl PDFColorSpace {
    /// Create a new color space.
    pub fn new(name: &str, ncomponents: usize) -> Self {
        Self {
            name: name.to_string(),
            ncomponents,
        }
    }

    /// Look up a predefined color space, expanding inline abbreviations.
    pub fn predefined(name: &str) -> Option<Self> {
        let name = INLINE_COLORSPACE_ABBREV.get(name).copied().unwrap_or(name);
        PREDEFINED_COLORSPACE.get(name).cloned()
    }

    pub fn device_gray() -> Self {
        Self::new("DeviceGray", 1)
    }

    /// Identify the family and component count of a color space object.
    ///
    /// Accepts a predefined name or a family array such as
    /// `[/ICCBased 5 0 R]`. Named resources must be looked up by the caller
    /// first; any other name yields `None`.
    pub fn from_object(obj: &PDFObject, scanner: &dyn TokenScanner) -> Result<Option<Self>> {
        let items = match scanner.resolve(obj)? {
            PDFObject::Name(name) => return Ok(Self::predefined(&name)),
            PDFObject::Array(items) => items,
            _ => return Ok(None),
        };
        let Some(family) = items.first().and_then(|f| f.as_name().ok()) else {
            return Ok(None);
        };
        let family = INLINE_COLORSPACE_ABBREV
            .get(family)
            .copied()
            .unwrap_or(family);

        let space = match family {
            "ICCBased" => {
                let n = match items.get(1) {
                    Some(profile) => match scanner.resolve(profile)? {
                        PDFObject::Stream(stream) => {
                            stream.get("N").and_then(|n| n.as_int().ok()).unwrap_or(3)
                        }
                        _ => 3,
                    },
                    None => 3,
                };
                Self::new(family, n.clamp(1, 4) as usize)
            }
            "DeviceN" => {
                let n = match items.get(1) {
                    Some(names) => match scanner.resolve(names)? {
                        PDFObject::Array(names) => names.len().max(1),
                        _ => 1,
                    },
                    None => 1,
                };
                Self::new(family, n)
            }
            other => match Self::predefined(other) {
                Some(space) => space,
                None => return Ok(None),
            },
        };
        Ok(Some(space))
    }
}

impl Default for PDFColorSpace {
    fn default() -> Self {
        Self::device_gray()
    }
}

/// Predefined PDF color spaces.
pub static PREDEFINED_COLORSPACE: LazyLock<HashMap<&'static str, PDFColorSpace>> =
    LazyLock::new(|| {
        let entries = [
            ("DeviceGray", 1),
            ("CalRGB", 3),
            ("CalGray", 1),
            ("Lab", 3),
            ("DeviceRGB", 3),
            ("DeviceCMYK", 4),
            ("Separation", 1),
            ("Indexed", 1),
            ("Pattern", 1),
        ];

        let mut map = HashMap::with_capacity(entries.len());
        for (name, n) in entries {
            map.insert(name, PDFColorSpace::new(name, n));
        }
        map
    });

/// Inline image color space abbreviations.
pub static INLINE_COLORSPACE_ABBREV: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        HashMap::from([
            ("G", "DeviceGray"),
            ("RGB", "DeviceRGB"),
            ("CMYK", "DeviceCMYK"),
            ("I", "Indexed"),
        ])
    });
