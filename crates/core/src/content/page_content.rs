//! The replayed content of one page.

use super::letter::Letter;
use super::marked::MarkedContentElement;
use super::path::PdfPath;
use super::resources::ResourceStore;
use crate::codec::filters::FilterProvider;
use crate::error::{PdfError, Result};
use crate::image::decode::{ImageDecoder, PdfImage};
use crate::image::reference::ImageReference;
use crate::interp::operation::GraphicsStateOperation;
use crate::interp::options::ContentOptions;
use crate::interp::replay::ContentReplay;
use crate::parser::content::ContentParser;
use crate::parser::scanner::TokenScanner;
use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;
use tracing::debug;

/// A page's operations together with what replaying them produced.
///
/// Letters, paths, image references and marked content are derived once
/// at construction. Image XObjects are only decoded when
/// [`PageContent::images`] is iterated, and decoded images are not kept.
pub struct PageContent {
    operations: Vec<GraphicsStateOperation>,
    letters: Vec<Letter>,
    paths: Vec<PdfPath>,
    images: Vec<ImageReference>,
    marked: Vec<MarkedContentElement>,
    scopes: Vec<Arc<dyn ResourceStore>>,
    scanner: Arc<dyn TokenScanner>,
    filters: Arc<dyn FilterProvider>,
    user_space_unit: f64,
    options: ContentOptions,
}

impl fmt::Debug for PageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageContent")
            .field("operations", &self.operations.len())
            .field("letters", &self.letters.len())
            .field("paths", &self.paths.len())
            .field("images", &self.images.len())
            .field("marked", &self.marked.len())
            .field("user_space_unit", &self.user_space_unit)
            .finish()
    }
}

impl PageContent {
    /// The operation tape, verbatim.
    pub fn operations(&self) -> &[GraphicsStateOperation] {
        &self.operations
    }

    pub fn letters(&self) -> &[Letter] {
        &self.letters
    }

    pub fn paths(&self) -> &[PdfPath] {
        &self.paths
    }

    pub fn image_references(&self) -> &[ImageReference] {
        &self.images
    }

    pub fn user_space_unit(&self) -> f64 {
        self.user_space_unit
    }

    /// Number of images on the page. Nothing is decoded.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Decode the page's images in document order.
    ///
    /// Each call starts over and decodes every XObject image again. Inline
    /// images yield the value parsed during replay, or its decode failure.
    pub fn images(&self) -> Images<'_> {
        Images {
            content: self,
            next: 0,
        }
    }

    /// Top-level marked-content regions in document order.
    pub fn marked_contents(&self) -> &[MarkedContentElement] {
        &self.marked
    }

    /// Letters produced inside a marked-content region.
    pub fn marked_letters(&self, element: &MarkedContentElement) -> &[Letter] {
        self.letters.get(element.letters.clone()).unwrap_or(&[])
    }

    fn decode(&self, reference: &ImageReference) -> Result<PdfImage> {
        match reference {
            ImageReference::Inline(record) => record.to_image(),
            ImageReference::XObject(record) => {
                let resources = self.scopes.get(record.scope).ok_or_else(|| {
                    PdfError::Decode(format!(
                        "no resource scope {} for /{}",
                        record.scope, record.name
                    ))
                })?;
                let decoder = ImageDecoder {
                    scanner: self.scanner.as_ref(),
                    filters: self.filters.as_ref(),
                    resources: resources.as_ref(),
                    mask_policy: self.options.mask_size_mismatch,
                };
                decoder.decode_xobject(record)
            }
        }
    }
}

/// Iterator returned by [`PageContent::images`].
#[derive(Debug)]
pub struct Images<'a> {
    content: &'a PageContent,
    next: usize,
}

impl Iterator for Images<'_> {
    type Item = Result<PdfImage>;

    fn next(&mut self) -> Option<Self::Item> {
        let reference = self.content.images.get(self.next)?;
        self.next += 1;
        Some(self.content.decode(reference))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.content.images.len() - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Images<'_> {}
impl FusedIterator for Images<'_> {}

/// Collaborators and settings for building a [`PageContent`].
pub struct PageContentBuilder {
    scanner: Arc<dyn TokenScanner>,
    filters: Arc<dyn FilterProvider>,
    resources: Arc<dyn ResourceStore>,
    parser: Option<Arc<dyn ContentParser>>,
    user_space_unit: f64,
    options: ContentOptions,
}

impl PageContentBuilder {
    pub fn new(
        scanner: Arc<dyn TokenScanner>,
        filters: Arc<dyn FilterProvider>,
        resources: Arc<dyn ResourceStore>,
    ) -> Self {
        Self {
            scanner,
            filters,
            resources,
            parser: None,
            user_space_unit: 1.0,
            options: ContentOptions::default(),
        }
    }

    /// Tokenizer used to replay form XObjects. Without one, forms are
    /// treated as malformed.
    pub fn content_parser(mut self, parser: Arc<dyn ContentParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Page `/UserUnit`; the initial CTM scales by it.
    pub fn user_space_unit(mut self, unit: f64) -> Self {
        self.user_space_unit = unit;
        self
    }

    pub fn options(mut self, options: ContentOptions) -> Self {
        self.options = options;
        self
    }

    /// Replay `operations` and build the page content.
    pub fn build(self, operations: Vec<GraphicsStateOperation>) -> Result<PageContent> {
        let unit = self.user_space_unit;
        if !(unit.is_finite() && unit > 0.0) {
            return Err(PdfError::content(
                "UserUnit",
                format!("invalid user space unit {unit}"),
            ));
        }

        let mut replay = ContentReplay::new(
            Arc::clone(&self.scanner),
            Arc::clone(&self.filters),
            self.resources,
            self.parser,
            self.options.clone(),
            (unit, 0.0, 0.0, unit, 0.0, 0.0),
        );
        replay.run(&operations)?;
        let out = replay.finish()?;
        debug!(
            operations = operations.len(),
            letters = out.letters.len(),
            paths = out.paths.len(),
            images = out.images.len(),
            "page content replayed"
        );

        Ok(PageContent {
            operations,
            letters: out.letters,
            paths: out.paths,
            images: out.images,
            marked: out.marked,
            scopes: out.scopes,
            scanner: self.scanner,
            filters: self.filters,
            user_space_unit: unit,
            options: self.options,
        })
    }
}
