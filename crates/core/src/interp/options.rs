//! Content replay configuration.

/// What to do when an image's `/SMask` dimensions differ from the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskMismatchPolicy {
    /// Fail the image decode with a decode error.
    #[default]
    Reject,
    /// Keep the image and discard its soft mask.
    DropMask,
}

/// Parameters for building a page's content model.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentOptions {
    /// Skip malformed sub-elements (missing fonts or XObjects, unbalanced
    /// `EMC`, broken forms) with a warning instead of failing.
    pub lenient: bool,
    /// Record `W`/`W*` clipping paths alongside painted paths.
    pub record_clipping_paths: bool,
    /// Deepest form XObject nesting that is still replayed.
    pub max_form_depth: usize,
    pub mask_size_mismatch: MaskMismatchPolicy,
}

impl Default for ContentOptions {
    fn default() -> Self {
        Self {
            lenient: true,
            record_clipping_paths: false,
            max_form_depth: 12,
            mask_size_mismatch: MaskMismatchPolicy::default(),
        }
    }
}

impl ContentOptions {
    /// Options that turn every recoverable replay problem into an error.
    pub fn strict() -> Self {
        Self {
            lenient: false,
            ..Self::default()
        }
    }
}
