//! Images painted by a page.
//!
//! - `reference` - what replay captures (`Do` records and inline image records)
//! - `decode` - turning image dictionaries into [`PdfImage`] values

pub mod decode;
pub mod reference;

pub use decode::{ImageDecoder, PdfImage, expand_inline_dict};
pub use reference::{ImageReference, InlineImageRecord, XObjectContentRecord};
