//! Encryption dictionary resolution.
//!
//! Reads the `/Encrypt` dictionary of a protected document into an
//! [`EncryptionDictionary`]: the parameters a security handler needs to
//! derive keys. No cryptography happens here.

use crate::error::{PdfError, Result};
use crate::model::objects::PDFObject;
use crate::parser::scanner::{TokenScanner, get_direct, get_resolved};
use std::collections::HashMap;

/// The `/V` entry: which algorithm family encrypts the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncryptionAlgorithmCode {
    /// `/V 0` or absent: undocumented, not supported.
    #[default]
    Unrecognized,
    /// `/V 1`: RC4 or AES with a 40-bit key.
    Rc4Bits40,
    /// `/V 2`: RC4 or AES with a key longer than 40 bits.
    Rc4Variable,
    /// `/V 3`: unpublished algorithm.
    Unpublished,
    /// `/V 4` and `/V 5`: crypt filters select the method per stream.
    AesOrRc4Extended,
}

impl EncryptionAlgorithmCode {
    /// Map a `/V` value to its code. Values outside the documented range
    /// yield `None`.
    pub const fn from_version(version: i64) -> Option<Self> {
        match version {
            0 => Some(Self::Unrecognized),
            1 => Some(Self::Rc4Bits40),
            2 => Some(Self::Rc4Variable),
            3 => Some(Self::Unpublished),
            4 | 5 => Some(Self::AesOrRc4Extended),
            _ => None,
        }
    }

    pub const fn is_supported(self) -> bool {
        !matches!(self, Self::Unrecognized | Self::Unpublished)
    }
}

/// The `/P` permission flags (bit positions per ISO 32000-1, Table 22).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct UserAccessPermissions(u32);

impl UserAccessPermissions {
    pub const PRINT: Self = Self(1 << 2);
    pub const MODIFY: Self = Self(1 << 3);
    pub const COPY: Self = Self(1 << 4);
    pub const ANNOTATE: Self = Self(1 << 5);
    pub const FILL_FORMS: Self = Self(1 << 8);
    pub const EXTRACT_ACCESSIBILITY: Self = Self(1 << 9);
    pub const ASSEMBLE: Self = Self(1 << 10);
    pub const PRINT_HIGH_QUALITY: Self = Self(1 << 11);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for UserAccessPermissions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Resolved parameters of a document's `/Encrypt` dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct EncryptionDictionary {
    /// Security handler name (`/Filter`), e.g. `Standard`.
    pub filter: String,
    pub sub_filter: Option<String>,
    pub algorithm: EncryptionAlgorithmCode,
    /// `/V` as written; `None` when the entry is absent.
    pub version: Option<i64>,
    /// `/Length` in bits, when given.
    pub key_length: Option<i64>,
    pub revision: i64,
    /// `/O`
    pub owner_hash: Vec<u8>,
    /// `/U`
    pub user_hash: Vec<u8>,
    /// `/OE`, present when revision >= 5.
    pub owner_key: Option<Vec<u8>>,
    /// `/UE`, present when revision >= 5.
    pub user_key: Option<Vec<u8>>,
    pub permissions: UserAccessPermissions,
    pub encrypt_metadata: bool,
    /// The dictionary as read, for handler-specific entries.
    pub source: HashMap<String, PDFObject>,
}

/// Resolve an `/Encrypt` dictionary. See [`EncryptionDictionary::from_dict`].
pub fn read_encryption_dictionary(
    dict: &HashMap<String, PDFObject>,
    scanner: &dyn TokenScanner,
) -> Result<EncryptionDictionary> {
    EncryptionDictionary::from_dict(dict, scanner)
}

impl EncryptionDictionary {
    /// Resolve `dict`, following indirect values through `scanner`.
    ///
    /// Fails when `/Filter` is missing or when a revision 5+ dictionary
    /// lacks `/OE` or `/UE`. `/EncryptMetadata` is only honoured as a
    /// direct boolean.
    pub fn from_dict(
        dict: &HashMap<String, PDFObject>,
        scanner: &dyn TokenScanner,
    ) -> Result<Self> {
        let filter = match get_resolved(dict, "Filter", scanner)? {
            Some(PDFObject::Name(name)) => name,
            Some(other) => {
                return Err(PdfError::MalformedDictionary {
                    key: "Filter".into(),
                    msg: format!("expected name, got {}", other.type_name()),
                });
            }
            None => {
                return Err(PdfError::MalformedDictionary {
                    key: "Filter".into(),
                    msg: "required entry is missing".into(),
                });
            }
        };

        let sub_filter = get_resolved(dict, "SubFilter", scanner)?
            .and_then(|v| v.as_name().ok().map(str::to_owned));

        let version = resolved_int(dict, "V", scanner)?;
        let algorithm = match version {
            Some(v) => EncryptionAlgorithmCode::from_version(v).unwrap_or_else(|| {
                tracing::warn!(version = v, "unknown /V in encryption dictionary");
                EncryptionAlgorithmCode::Unrecognized
            }),
            None => EncryptionAlgorithmCode::Unrecognized,
        };

        let key_length = resolved_int(dict, "Length", scanner)?;
        let revision = resolved_int(dict, "R", scanner)?.unwrap_or(0);

        let owner_hash = resolved_string(dict, "O", scanner)?.unwrap_or_default();
        let user_hash = resolved_string(dict, "U", scanner)?.unwrap_or_default();

        // Negative /P values are the signed form of the 32-bit mask.
        let permissions = match resolved_int(dict, "P", scanner)? {
            None => UserAccessPermissions::default(),
            Some(p) => {
                let bits = i32::try_from(p)
                    .map(|v| v as u32)
                    .or_else(|_| u32::try_from(p))
                    .map_err(|_| PdfError::MalformedDictionary {
                        key: "P".into(),
                        msg: format!("{p} does not fit a 32-bit permission mask"),
                    })?;
                UserAccessPermissions::from_bits(bits)
            }
        };

        let (owner_key, user_key) = if revision >= 5 {
            (
                Some(required_string(dict, "OE", revision, scanner)?),
                Some(required_string(dict, "UE", revision, scanner)?),
            )
        } else {
            (None, None)
        };

        let encrypt_metadata = match get_direct(dict, "EncryptMetadata") {
            Some(PDFObject::Bool(b)) => *b,
            _ => true,
        };

        tracing::debug!(
            filter = %filter,
            ?version,
            revision,
            ?key_length,
            "resolved encryption dictionary"
        );

        Ok(Self {
            filter,
            sub_filter,
            algorithm,
            version,
            key_length,
            revision,
            owner_hash,
            user_hash,
            owner_key,
            user_key,
            permissions,
            encrypt_metadata,
            source: dict.clone(),
        })
    }

    /// Key length in bits; `/Length` defaults to 40.
    pub fn key_length_bits(&self) -> i64 {
        self.key_length.unwrap_or(40)
    }

    /// Whether the password-based standard security handler applies.
    pub fn is_standard_handler(&self) -> bool {
        self.filter == "Standard"
    }

    /// Crypt filter for streams (`/StmF`), `Identity` when absent.
    pub fn stream_filter(&self) -> &str {
        self.source_name("StmF").unwrap_or("Identity")
    }

    /// Crypt filter for strings (`/StrF`), `Identity` when absent.
    pub fn string_filter(&self) -> &str {
        self.source_name("StrF").unwrap_or("Identity")
    }

    /// Crypt filter dictionary `name` from `/CF`.
    pub fn crypt_filter(&self, name: &str) -> Option<&HashMap<String, PDFObject>> {
        self.source
            .get("CF")
            .and_then(|cf| cf.as_dict().ok())
            .and_then(|cf| cf.get(name))
            .and_then(|f| f.as_dict().ok())
    }

    /// Fail for algorithm codes no security handler can implement.
    pub fn require_supported_algorithm(&self) -> Result<EncryptionAlgorithmCode> {
        if self.algorithm.is_supported() {
            Ok(self.algorithm)
        } else {
            Err(PdfError::UnsupportedAlgorithm(self.version))
        }
    }

    fn source_name(&self, key: &str) -> Option<&str> {
        self.source.get(key).and_then(|v| v.as_name().ok())
    }
}

fn resolved_int(
    dict: &HashMap<String, PDFObject>,
    key: &str,
    scanner: &dyn TokenScanner,
) -> Result<Option<i64>> {
    match get_resolved(dict, key, scanner)? {
        None => Ok(None),
        Some(PDFObject::Int(n)) => Ok(Some(n)),
        // Some writers emit integral reals.
        Some(PDFObject::Real(r)) if r.fract() == 0.0 => Ok(Some(r as i64)),
        Some(other) => Err(PdfError::MalformedDictionary {
            key: key.to_string(),
            msg: format!("expected integer, got {}", other.type_name()),
        }),
    }
}

fn resolved_string(
    dict: &HashMap<String, PDFObject>,
    key: &str,
    scanner: &dyn TokenScanner,
) -> Result<Option<Vec<u8>>> {
    match get_resolved(dict, key, scanner)? {
        None => Ok(None),
        Some(value) => match value.string_bytes() {
            Ok(bytes) => Ok(Some(bytes.into_owned())),
            Err(_) => Err(PdfError::MalformedDictionary {
                key: key.to_string(),
                msg: format!("expected string, got {}", value.type_name()),
            }),
        },
    }
}

fn required_string(
    dict: &HashMap<String, PDFObject>,
    key: &str,
    revision: i64,
    scanner: &dyn TokenScanner,
) -> Result<Vec<u8>> {
    resolved_string(dict, key, scanner)?.ok_or_else(|| PdfError::MissingRequiredField {
        field: key.to_string(),
        revision,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_codes() {
        assert_eq!(
            EncryptionAlgorithmCode::from_version(5),
            Some(EncryptionAlgorithmCode::AesOrRc4Extended)
        );
        assert_eq!(EncryptionAlgorithmCode::from_version(9), None);
        assert!(!EncryptionAlgorithmCode::Unpublished.is_supported());
    }

    #[test]
    fn negative_p_is_unsigned_mask() {
        let p = UserAccessPermissions::from_bits(-44_i64 as u32);
        assert!(p.contains(UserAccessPermissions::PRINT));
        assert!(!p.contains(UserAccessPermissions::MODIFY));
        assert!(p.contains(UserAccessPermissions::PRINT | UserAccessPermissions::COPY));
    }
}
