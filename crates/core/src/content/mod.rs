//! The page content model.
//!
//! - `page_content` - [`PageContent`] and its builder
//! - `letter` - shown glyphs
//! - `path` - painted and clipping paths
//! - `marked` - marked-content regions
//! - `resources` - the [`ResourceStore`] seam and a dictionary-backed store

pub mod letter;
pub mod marked;
pub mod page_content;
pub mod path;
pub mod resources;

pub use letter::Letter;
pub use marked::MarkedContentElement;
pub use page_content::{Images, PageContent, PageContentBuilder};
pub use path::{FillingRule, PathCommand, PdfPath, Subpath};
pub use resources::{DictResourceStore, ResourceStore, resolve_color_space_with};
