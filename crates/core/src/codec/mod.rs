//! Codec modules for PDF stream filters.
//!
//! This module contains:
//! - `ascii85`: ASCII85 and ASCIIHex decoding
//! - `filters`: the [`FilterProvider`] seam and the standard filter set

pub mod ascii85;
pub mod filters;

pub use ascii85::{ascii85decode, asciihexdecode};
pub use filters::{
    FilterProvider, StandardFilters, decode_stream, expand_filter_name, flatedecode, is_image_codec,
    lzwdecode_with_earlychange, rldecode,
};
