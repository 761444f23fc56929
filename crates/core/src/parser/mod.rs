//! Byte access and object resolution seams.
//!
//! - `cursor`: seekable byte reader over raw document bytes
//! - `scanner`: indirect object resolution
//! - `content`: content stream tokenizer seam

pub mod content;
pub mod cursor;
pub mod scanner;

pub use content::ContentParser;
pub use cursor::{ByteCursor, SliceCursor};
pub use scanner::{MemoryScanner, TokenScanner, get_direct, get_resolved};
