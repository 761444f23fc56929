//! salvor - recovery-oriented PDF parsing.
//!
//! - [`document::locator`] finds indirect objects by scanning raw bytes
//!   when the cross-reference table cannot be trusted.
//! - [`document::encryption`] reads a document's `/Encrypt` dictionary into
//!   typed parameters.
//! - [`content`] replays a page's content stream operations into letters,
//!   paths, images and marked-content regions.

pub mod codec;
pub mod content;
pub mod document;
pub mod error;
pub mod font;
pub mod image;
pub mod interp;
pub mod model;
pub mod parser;
pub mod utils;

pub use codec::{FilterProvider, StandardFilters};
pub use content::{
    DictResourceStore, Letter, MarkedContentElement, PageContent, PageContentBuilder, PdfPath,
    ResourceStore,
};
pub use document::encryption::{
    EncryptionAlgorithmCode, EncryptionDictionary, UserAccessPermissions,
    read_encryption_dictionary,
};
pub use document::locator::{ObjectLocations, ScanOptions, locate_objects, locate_objects_with};
pub use error::{PdfError, Result};
pub use image::{ImageReference, InlineImageRecord, PdfImage, XObjectContentRecord};
pub use interp::{ContentOptions, GraphicsStateOperation, MaskMismatchPolicy};
pub use model::{PDFObjRef, PDFObject, PDFStream};
pub use parser::{ByteCursor, ContentParser, MemoryScanner, SliceCursor, TokenScanner};
