//! Document-level recovery and security parameters.
//!
//! This module contains:
//! - `locator` - brute-force object offset recovery
//! - `encryption` - `/Encrypt` dictionary resolution

pub mod encryption;
pub mod locator;

pub use encryption::{
    EncryptionAlgorithmCode, EncryptionDictionary, UserAccessPermissions,
    read_encryption_dictionary,
};
pub use locator::{
    ObjectLocations, ScanOptions, ScanState, Transition, find_last_eof_marker, locate_objects,
    locate_objects_with, scan_step,
};
