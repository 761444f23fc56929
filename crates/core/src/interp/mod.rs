//! Content stream replay.
//!
//! This module contains:
//! - `operation`: typed content stream operations
//! - `options`: replay leniency and capture configuration
//! - `replay`: the replay loop and its state
//! - `ops`: operator implementations by category

pub mod operation;
pub mod options;
mod ops;
pub(crate) mod replay;

pub use operation::{GraphicsStateOperation, TextSeqItem};
pub use options::{ContentOptions, MaskMismatchPolicy};
