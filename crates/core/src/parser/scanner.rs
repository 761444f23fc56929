//! Indirect object resolution.

use crate::error::{PdfError, Result};
use crate::model::objects::{PDFObjRef, PDFObject};
use rustc_hash::FxHashMap;
use std::collections::HashMap;

/// Maximum number of references followed by [`TokenScanner::resolve`].
pub const MAX_RESOLVE_DEPTH: usize = 32;

/// Resolves indirect references to the objects they name.
pub trait TokenScanner: Send + Sync {
    /// Load the object stored under `reference`.
    fn get(&self, reference: &PDFObjRef) -> Result<PDFObject>;

    /// Follow a chain of indirect references until a direct object.
    ///
    /// Chains longer than [`MAX_RESOLVE_DEPTH`] (including cycles) fail
    /// with a format error.
    fn resolve(&self, object: &PDFObject) -> Result<PDFObject> {
        let mut current = object.clone();
        for _ in 0..MAX_RESOLVE_DEPTH {
            match current {
                PDFObject::Ref(reference) => current = self.get(&reference)?,
                direct => return Ok(direct),
            }
        }
        Err(PdfError::Format {
            offset: 0,
            msg: format!("reference chain deeper than {MAX_RESOLVE_DEPTH} from {object:?}"),
        })
    }
}

/// Look up `key` and dereference the value through `scanner`.
///
/// A missing key or a reference to an absent object yields `Ok(None)`.
pub fn get_resolved(
    dict: &HashMap<String, PDFObject>,
    key: &str,
    scanner: &dyn TokenScanner,
) -> Result<Option<PDFObject>> {
    let Some(value) = dict.get(key) else {
        return Ok(None);
    };
    match scanner.resolve(value) {
        Ok(PDFObject::Null) => Ok(None),
        Ok(resolved) => Ok(Some(resolved)),
        Err(PdfError::ObjectNotFound(reference)) => {
            tracing::debug!(key, %reference, "dangling reference treated as absent");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Look up `key` without following indirection.
///
/// Indirect values are reported as absent.
pub fn get_direct<'a>(dict: &'a HashMap<String, PDFObject>, key: &str) -> Option<&'a PDFObject> {
    dict.get(key).filter(|v| !matches!(v, PDFObject::Ref(_)))
}

/// In-memory object table.
#[derive(Debug, Default, Clone)]
pub struct MemoryScanner {
    objects: FxHashMap<PDFObjRef, PDFObject>,
}

impl MemoryScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `object` under `reference`, replacing any previous value.
    pub fn insert(&mut self, reference: PDFObjRef, object: PDFObject) -> Option<PDFObject> {
        self.objects.insert(reference, object)
    }

    /// Builder-style [`MemoryScanner::insert`].
    pub fn with(mut self, objid: u64, genno: u32, object: PDFObject) -> Self {
        self.insert(PDFObjRef::new(objid, genno), object);
        self
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl TokenScanner for MemoryScanner {
    fn get(&self, reference: &PDFObjRef) -> Result<PDFObject> {
        self.objects
            .get(reference)
            .cloned()
            .ok_or(PdfError::ObjectNotFound(*reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_follows_chains() {
        let scanner = MemoryScanner::new()
            .with(1, 0, PDFObject::Ref(PDFObjRef::new(2, 0)))
            .with(2, 0, PDFObject::Int(7));
        let value = scanner.resolve(&PDFObject::Ref(PDFObjRef::new(1, 0))).unwrap();
        assert_eq!(value, PDFObject::Int(7));
    }

    #[test]
    fn resolve_rejects_cycles() {
        let scanner = MemoryScanner::new()
            .with(1, 0, PDFObject::Ref(PDFObjRef::new(2, 0)))
            .with(2, 0, PDFObject::Ref(PDFObjRef::new(1, 0)));
        let err = scanner
            .resolve(&PDFObject::Ref(PDFObjRef::new(1, 0)))
            .unwrap_err();
        assert!(matches!(err, PdfError::Format { .. }));
    }

    #[test]
    fn get_direct_skips_references() {
        let mut dict = HashMap::new();
        dict.insert("A".to_string(), PDFObject::Bool(false));
        dict.insert("B".to_string(), PDFObject::Ref(PDFObjRef::new(3, 0)));
        assert_eq!(get_direct(&dict, "A"), Some(&PDFObject::Bool(false)));
        assert_eq!(get_direct(&dict, "B"), None);
    }

    #[test]
    fn get_resolved_treats_dangling_as_absent() {
        let mut dict = HashMap::new();
        dict.insert("R".to_string(), PDFObject::Ref(PDFObjRef::new(9, 0)));
        let scanner = MemoryScanner::new();
        assert_eq!(get_resolved(&dict, "R", &scanner).unwrap(), None);
        assert_eq!(get_resolved(&dict, "Missing", &scanner).unwrap(), None);
    }
}
