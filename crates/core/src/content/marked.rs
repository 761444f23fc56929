//! Marked-content sequences (`BMC`/`BDC` ... `EMC`).

use crate::model::objects::PDFObject;
use crate::parser::scanner::get_direct;
use crate::utils::decode_text;
use std::collections::HashMap;
use std::ops::Range;

/// A closed marked-content region.
///
/// The ranges index into the page's letters, paths and images and cover
/// what was produced between the opening operator and its `EMC`,
/// including output of nested regions.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkedContentElement {
    pub tag: String,
    pub mcid: Option<i64>,
    pub properties: Option<HashMap<String, PDFObject>>,
    pub actual_text: Option<String>,
    pub alternate_description: Option<String>,
    pub expanded_form: Option<String>,
    pub language: Option<String>,
    pub is_artifact: bool,
    /// Position of the opening operator among all regions on the page.
    pub index: usize,
    pub children: Vec<MarkedContentElement>,
    pub letters: Range<usize>,
    pub paths: Range<usize>,
    pub images: Range<usize>,
}

impl MarkedContentElement {
    fn open(
        tag: String,
        properties: Option<HashMap<String, PDFObject>>,
        index: usize,
        start: Counts,
    ) -> Self {
        let text = |key: &str| {
            properties
                .as_ref()
                .and_then(|p| get_direct(p, key))
                .and_then(|v| v.string_bytes().ok())
                .map(|b| decode_text(&b))
        };
        let mcid = properties
            .as_ref()
            .and_then(|p| get_direct(p, "MCID"))
            .and_then(|v| v.as_int().ok());

        Self {
            is_artifact: tag == "Artifact",
            mcid,
            actual_text: text("ActualText"),
            alternate_description: text("Alt"),
            expanded_form: text("E"),
            language: text("Lang"),
            tag,
            properties,
            index,
            children: Vec::new(),
            letters: start.letters..start.letters,
            paths: start.paths..start.paths,
            images: start.images..start.images,
        }
    }

    /// This region followed by all nested regions, depth first.
    pub fn flatten(&self) -> Vec<&MarkedContentElement> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.flatten());
        }
        out
    }
}

/// Output lengths at a point of the replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Counts {
    pub letters: usize,
    pub paths: usize,
    pub images: usize,
}

/// Regions still open during replay plus the finished top-level ones.
#[derive(Debug, Default)]
pub(crate) struct MarkedContentStack {
    open: Vec<MarkedContentElement>,
    closed: Vec<MarkedContentElement>,
    next_index: usize,
}

impl MarkedContentStack {
    pub(crate) fn begin(
        &mut self,
        tag: String,
        properties: Option<HashMap<String, PDFObject>>,
        at: Counts,
    ) {
        let element = MarkedContentElement::open(tag, properties, self.next_index, at);
        self.next_index += 1;
        self.open.push(element);
    }

    /// Close the innermost region. Returns false when none is open.
    pub(crate) fn end(&mut self, at: Counts) -> bool {
        let Some(mut element) = self.open.pop() else {
            return false;
        };
        element.letters.end = at.letters;
        element.paths.end = at.paths;
        element.images.end = at.images;
        match self.open.last_mut() {
            Some(parent) => parent.children.push(element),
            None => self.closed.push(element),
        }
        true
    }

    pub(crate) fn depth(&self) -> usize {
        self.open.len()
    }

    /// Close whatever is still open and return the top-level regions.
    pub(crate) fn finish(mut self, at: Counts) -> Vec<MarkedContentElement> {
        while self.end(at) {}
        self.closed
    }
}
