//! Page and form resource lookup.

use crate::codec::filters::FilterProvider;
use crate::error::{PdfError, Result};
use crate::font::{PdfFont, load_font};
use crate::model::color::PDFColorSpace;
use crate::model::objects::{PDFObject, PDFStream};
use crate::parser::scanner::{TokenScanner, get_resolved};
use rustc_hash::FxHashMap;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Named resources available to a content stream.
///
/// Lookups return `Ok(None)` when the name is not defined; errors are
/// reserved for resources that exist but cannot be read.
pub trait ResourceStore: Send + Sync {
    /// `/Font` entry, loaded.
    fn font(&self, name: &str) -> Result<Option<Arc<dyn PdfFont>>>;

    /// `/XObject` entry. The stream carries its indirect reference when it
    /// was stored as one.
    fn xobject(&self, name: &str) -> Result<Option<PDFStream>>;

    /// `/ColorSpace` entry, unresolved beyond the top level.
    fn named_color_space(&self, name: &str) -> Result<Option<PDFObject>>;

    /// `/Properties` entry used by `BDC` and `DP`.
    fn properties(&self, name: &str) -> Result<Option<HashMap<String, PDFObject>>>;

    /// `/ExtGState` entry used by `gs`.
    fn ext_graphics_state(&self, name: &str) -> Result<Option<HashMap<String, PDFObject>>>;

    /// Resolve an image's `/ColorSpace` value, following named resources.
    fn resolve_color_space(&self, color_space: &PDFObject) -> Result<PDFColorSpace>;
}

/// A store backed by a `/Resources` dictionary.
///
/// Form XObjects get a store over their own dictionary whose parent is
/// the store of the content that invoked them; names not defined locally
/// are looked up in the parent.
pub struct DictResourceStore {
    resources: HashMap<String, PDFObject>,
    scanner: Arc<dyn TokenScanner>,
    filters: Arc<dyn FilterProvider>,
    parent: Option<Arc<dyn ResourceStore>>,
    fonts: Mutex<FxHashMap<String, Arc<dyn PdfFont>>>,
}

impl std::fmt::Debug for DictResourceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DictResourceStore")
            .field("categories", &self.resources.keys().collect::<Vec<_>>())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

impl DictResourceStore {
    pub fn new(
        resources: HashMap<String, PDFObject>,
        scanner: Arc<dyn TokenScanner>,
        filters: Arc<dyn FilterProvider>,
    ) -> Self {
        Self {
            resources,
            scanner,
            filters,
            parent: None,
            fonts: Mutex::new(FxHashMap::default()),
        }
    }

    /// Layer this store over `parent`.
    pub fn with_parent(mut self, parent: Arc<dyn ResourceStore>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Resolved entry `name` of the category dictionary `category`.
    fn entry(&self, category: &str, name: &str) -> Result<Option<PDFObject>> {
        let scanner = self.scanner.as_ref();
        match get_resolved(&self.resources, category, scanner)? {
            Some(PDFObject::Dict(dict)) => get_resolved(&dict, name, scanner),
            _ => Ok(None),
        }
    }

    fn dict_entry(&self, category: &str, name: &str) -> Result<Option<HashMap<String, PDFObject>>> {
        match self.entry(category, name)? {
            Some(PDFObject::Dict(dict)) => Ok(Some(dict)),
            Some(other) => Err(PdfError::TypeError {
                expected: "dict",
                got: other.type_name(),
            }),
            None => Ok(None),
        }
    }
}

impl ResourceStore for DictResourceStore {
    fn font(&self, name: &str) -> Result<Option<Arc<dyn PdfFont>>> {
        let mut fonts = self.fonts.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(font) = fonts.get(name) {
            return Ok(Some(Arc::clone(font)));
        }
        match self.entry("Font", name)? {
            Some(PDFObject::Dict(dict)) => {
                let font = load_font(&dict, self.scanner.as_ref(), self.filters.as_ref())?;
                fonts.insert(name.to_string(), Arc::clone(&font));
                Ok(Some(font))
            }
            Some(other) => Err(PdfError::TypeError {
                expected: "dict",
                got: other.type_name(),
            }),
            None => match &self.parent {
                Some(parent) => parent.font(name),
                None => Ok(None),
            },
        }
    }

    fn xobject(&self, name: &str) -> Result<Option<PDFStream>> {
        let category = get_resolved(&self.resources, "XObject", self.scanner.as_ref())?;
        let raw = match &category {
            Some(PDFObject::Dict(dict)) => dict.get(name),
            _ => None,
        };
        let Some(raw) = raw else {
            return match &self.parent {
                Some(parent) => parent.xobject(name),
                None => Ok(None),
            };
        };
        match self.scanner.resolve(raw) {
            Ok(PDFObject::Stream(stream)) => {
                let stream = *stream;
                Ok(Some(match (raw, stream.reference) {
                    (PDFObject::Ref(reference), None) => stream.with_reference(*reference),
                    _ => stream,
                }))
            }
            Ok(PDFObject::Null) | Err(PdfError::ObjectNotFound(_)) => Ok(None),
            Ok(other) => Err(PdfError::TypeError {
                expected: "stream",
                got: other.type_name(),
            }),
            Err(err) => Err(err),
        }
    }

    fn named_color_space(&self, name: &str) -> Result<Option<PDFObject>> {
        match self.entry("ColorSpace", name)? {
            Some(space) => Ok(Some(space)),
            None => match &self.parent {
                Some(parent) => parent.named_color_space(name),
                None => Ok(None),
            },
        }
    }

    fn properties(&self, name: &str) -> Result<Option<HashMap<String, PDFObject>>> {
        match self.dict_entry("Properties", name)? {
            Some(dict) => Ok(Some(dict)),
            None => match &self.parent {
                Some(parent) => parent.properties(name),
                None => Ok(None),
            },
        }
    }

    fn ext_graphics_state(&self, name: &str) -> Result<Option<HashMap<String, PDFObject>>> {
        match self.dict_entry("ExtGState", name)? {
            Some(dict) => Ok(Some(dict)),
            None => match &self.parent {
                Some(parent) => parent.ext_graphics_state(name),
                None => Ok(None),
            },
        }
    }

    fn resolve_color_space(&self, color_space: &PDFObject) -> Result<PDFColorSpace> {
        resolve_color_space_with(self, self.scanner.as_ref(), color_space)
    }
}

/// Resolve a color space object against `store`'s named color spaces.
///
/// Shared by [`ResourceStore`] implementations that keep the usual
/// `/ColorSpace` category.
pub fn resolve_color_space_with(
    store: &dyn ResourceStore,
    scanner: &dyn TokenScanner,
    color_space: &PDFObject,
) -> Result<PDFColorSpace> {
    let mut current = scanner.resolve(color_space)?;
    // Named resources may themselves be names of other resources.
    for _ in 0..8 {
        if let Some(space) = PDFColorSpace::from_object(&current, scanner)? {
            return Ok(space);
        }
        let PDFObject::Name(name) = &current else {
            break;
        };
        match store.named_color_space(name)? {
            Some(next) => current = scanner.resolve(&next)?,
            None => break,
        }
    }
    Err(PdfError::Decode(format!("unknown color space {current:?}")))
}
