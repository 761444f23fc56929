//! Tests for `/Encrypt` dictionary resolution.

use salvor_core::document::encryption::{
    EncryptionAlgorithmCode, UserAccessPermissions, read_encryption_dictionary,
};
use salvor_core::error::PdfError;
use salvor_core::model::{PDFObjRef, PDFObject};
use salvor_core::parser::MemoryScanner;
use std::collections::HashMap;

// 32-byte /O and /U values, as found in an RC4 128-bit document.
const OWNER: [u8; 32] = [
    208, 72, 209, 82, 158, 83, 93, 24, 132, 205, 56, 86, 54, 123, 24, 75, 74, 144, 223, 1, 230, 55,
    209, 110, 202, 6, 91, 175, 78, 100, 144, 11,
];
const USER: [u8; 32] = [
    105, 75, 157, 162, 248, 9, 199, 124, 114, 119, 140, 251, 202, 194, 4, 129, 178, 114, 5, 208,
    231, 211, 34, 98, 54, 130, 131, 100, 102, 106, 151, 8,
];

fn name(s: &str) -> PDFObject {
    PDFObject::Name(s.to_string())
}

fn encrypt_dict(entries: Vec<(&str, PDFObject)>) -> HashMap<String, PDFObject> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn rc4_128() -> HashMap<String, PDFObject> {
    encrypt_dict(vec![
        ("Filter", name("Standard")),
        ("V", PDFObject::Int(2)),
        ("R", PDFObject::Int(3)),
        ("Length", PDFObject::Int(128)),
        ("P", PDFObject::Int(-4)),
        ("O", PDFObject::String(OWNER.to_vec())),
        ("U", PDFObject::String(USER.to_vec())),
    ])
}

fn aes_256(with_oe: bool) -> HashMap<String, PDFObject> {
    let mut dict = encrypt_dict(vec![
        ("Filter", name("Standard")),
        ("V", PDFObject::Int(5)),
        ("R", PDFObject::Int(6)),
        ("Length", PDFObject::Int(256)),
        ("P", PDFObject::Int(-1028)),
        ("O", PDFObject::String(vec![0x11; 48])),
        ("U", PDFObject::String(vec![0x22; 48])),
        ("UE", PDFObject::String(vec![0x33; 32])),
        ("Perms", PDFObject::String(vec![0x44; 16])),
        ("StmF", name("StdCF")),
        ("StrF", name("StdCF")),
        (
            "CF",
            PDFObject::Dict(encrypt_dict(vec![(
                "StdCF",
                PDFObject::Dict(encrypt_dict(vec![
                    ("CFM", name("AESV3")),
                    ("AuthEvent", name("DocOpen")),
                    ("Length", PDFObject::Int(32)),
                ])),
            )])),
        ),
    ]);
    if with_oe {
        dict.insert("OE".into(), PDFObject::String(vec![0x55; 32]));
    }
    dict
}

#[test]
fn rc4_dictionary_resolves() {
    let enc = read_encryption_dictionary(&rc4_128(), &MemoryScanner::new()).unwrap();

    assert_eq!(enc.filter, "Standard");
    assert!(enc.is_standard_handler());
    assert_eq!(enc.algorithm, EncryptionAlgorithmCode::Rc4Variable);
    assert_eq!(enc.version, Some(2));
    assert_eq!(enc.revision, 3);
    assert_eq!(enc.key_length, Some(128));
    assert_eq!(enc.owner_hash, OWNER);
    assert_eq!(enc.user_hash, USER);
    assert_eq!(enc.owner_key, None);
    assert_eq!(enc.user_key, None);
    assert!(enc.encrypt_metadata);
    assert_eq!(enc.permissions.bits(), 0xFFFF_FFFC);
    assert!(enc.permissions.contains(UserAccessPermissions::PRINT));
}

#[test]
fn revision_6_with_key_data_resolves() {
    let enc = read_encryption_dictionary(&aes_256(true), &MemoryScanner::new()).unwrap();

    assert_eq!(enc.algorithm, EncryptionAlgorithmCode::AesOrRc4Extended);
    let owner_key = enc.owner_key.as_deref().unwrap();
    let user_key = enc.user_key.as_deref().unwrap();
    assert!(!owner_key.is_empty());
    assert!(!user_key.is_empty());
    assert_eq!(owner_key, &[0x55; 32]);
    assert_eq!(enc.stream_filter(), "StdCF");
    assert_eq!(enc.string_filter(), "StdCF");
    let cf = enc.crypt_filter("StdCF").unwrap();
    assert_eq!(cf.get("CFM"), Some(&name("AESV3")));
    assert!(enc.source.contains_key("Perms"));
}

#[test]
fn revision_6_without_oe_is_missing_field() {
    let err = read_encryption_dictionary(&aes_256(false), &MemoryScanner::new()).unwrap_err();

    match err {
        PdfError::MissingRequiredField { field, revision } => {
            assert_eq!(field, "OE");
            assert_eq!(revision, 6);
        }
        other => panic!("expected MissingRequiredField, got {other:?}"),
    }
}

#[test]
fn revision_5_without_ue_is_missing_field() {
    let mut dict = aes_256(true);
    dict.insert("R".into(), PDFObject::Int(5));
    dict.remove("UE");

    let err = read_encryption_dictionary(&dict, &MemoryScanner::new()).unwrap_err();
    assert!(matches!(
        err,
        PdfError::MissingRequiredField { ref field, revision: 5 } if field == "UE"
    ));
}

#[test]
fn hex_and_literal_owner_values_are_identical() {
    let hex_digits = hex::encode(OWNER).into_bytes();

    let mut literal = rc4_128();
    literal.insert("O".into(), PDFObject::String(OWNER.to_vec()));
    let mut hexed = rc4_128();
    hexed.insert("O".into(), PDFObject::HexString(hex_digits));

    let scanner = MemoryScanner::new();
    let a = read_encryption_dictionary(&literal, &scanner).unwrap();
    let b = read_encryption_dictionary(&hexed, &scanner).unwrap();

    assert_eq!(a.owner_hash, b.owner_hash);
    assert_eq!(b.owner_hash, OWNER);
}

#[test]
fn indirect_values_are_followed() {
    let scanner = MemoryScanner::new()
        .with(20, 0, PDFObject::String(OWNER.to_vec()))
        .with(21, 0, PDFObject::Int(4))
        .with(22, 0, PDFObject::Int(4));
    let mut dict = rc4_128();
    dict.insert("O".into(), PDFObject::Ref(PDFObjRef::new(20, 0)));
    dict.insert("V".into(), PDFObject::Ref(PDFObjRef::new(21, 0)));
    dict.insert("R".into(), PDFObject::Ref(PDFObjRef::new(22, 0)));

    let enc = read_encryption_dictionary(&dict, &scanner).unwrap();
    assert_eq!(enc.owner_hash, OWNER);
    assert_eq!(enc.algorithm, EncryptionAlgorithmCode::AesOrRc4Extended);
    assert_eq!(enc.revision, 4);
}

#[test]
fn unrecognized_version_is_distinct_from_absent() {
    let scanner = MemoryScanner::new();

    let mut unknown = rc4_128();
    unknown.insert("V".into(), PDFObject::Int(7));
    let unknown = read_encryption_dictionary(&unknown, &scanner).unwrap();

    let mut absent = rc4_128();
    absent.remove("V");
    let absent = read_encryption_dictionary(&absent, &scanner).unwrap();

    assert_eq!(unknown.algorithm, EncryptionAlgorithmCode::Unrecognized);
    assert_eq!(absent.algorithm, EncryptionAlgorithmCode::Unrecognized);
    assert_eq!(unknown.version, Some(7));
    assert_eq!(absent.version, None);

    assert!(matches!(
        unknown.require_supported_algorithm(),
        Err(PdfError::UnsupportedAlgorithm(Some(7)))
    ));
    assert!(matches!(
        absent.require_supported_algorithm(),
        Err(PdfError::UnsupportedAlgorithm(None))
    ));
}

#[test]
fn indirect_encrypt_metadata_is_ignored() {
    let scanner = MemoryScanner::new().with(30, 0, PDFObject::Bool(false));

    let mut indirect = aes_256(true);
    indirect.insert(
        "EncryptMetadata".into(),
        PDFObject::Ref(PDFObjRef::new(30, 0)),
    );
    let enc = read_encryption_dictionary(&indirect, &scanner).unwrap();
    assert!(enc.encrypt_metadata);

    let mut direct = aes_256(true);
    direct.insert("EncryptMetadata".into(), PDFObject::Bool(false));
    let enc = read_encryption_dictionary(&direct, &scanner).unwrap();
    assert!(!enc.encrypt_metadata);
}

#[test]
fn defaults_for_optional_entries() {
    let dict = encrypt_dict(vec![("Filter", name("Adobe.PubSec"))]);
    let enc = read_encryption_dictionary(&dict, &MemoryScanner::new()).unwrap();

    assert!(!enc.is_standard_handler());
    assert_eq!(enc.revision, 0);
    assert_eq!(enc.key_length, None);
    assert_eq!(enc.key_length_bits(), 40);
    assert!(enc.owner_hash.is_empty());
    assert!(enc.user_hash.is_empty());
    assert_eq!(enc.permissions, UserAccessPermissions::default());
    assert_eq!(enc.stream_filter(), "Identity");
}

#[test]
fn missing_filter_is_malformed() {
    let mut dict = rc4_128();
    dict.remove("Filter");

    let err = read_encryption_dictionary(&dict, &MemoryScanner::new()).unwrap_err();
    assert!(matches!(err, PdfError::MalformedDictionary { ref key, .. } if key == "Filter"));
}

#[test]
fn non_string_owner_value_is_malformed() {
    let mut dict = rc4_128();
    dict.insert("O".into(), PDFObject::Int(1));

    let err = read_encryption_dictionary(&dict, &MemoryScanner::new()).unwrap_err();
    assert!(matches!(err, PdfError::MalformedDictionary { ref key, .. } if key == "O"));
}

#[test]
fn permissions_accept_signed_and_unsigned_32_bit_forms() {
    let scanner = MemoryScanner::new();

    let mut unsigned = rc4_128();
    unsigned.insert("P".into(), PDFObject::Int(0xFFFF_FFFC));
    let enc = read_encryption_dictionary(&unsigned, &scanner).unwrap();
    assert_eq!(enc.permissions.bits(), 0xFFFF_FFFC);

    let mut too_wide = rc4_128();
    too_wide.insert("P".into(), PDFObject::Int(4_294_967_300));
    let err = read_encryption_dictionary(&too_wide, &scanner).unwrap_err();
    assert!(matches!(err, PdfError::MalformedDictionary { ref key, .. } if key == "P"));

    let mut too_negative = rc4_128();
    too_negative.insert("P".into(), PDFObject::Int(i64::from(i32::MIN) - 1));
    assert!(read_encryption_dictionary(&too_negative, &scanner).is_err());
}
