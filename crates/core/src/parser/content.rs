//! Content stream tokenizer seam.

use crate::error::Result;
use crate::interp::operation::GraphicsStateOperation;

/// Turns decoded content-stream bytes into an ordered operation tape.
///
/// Used to replay form XObjects; page-level tapes are handed to the
/// builder already parsed.
pub trait ContentParser: Send + Sync {
    fn parse(&self, data: &[u8]) -> Result<Vec<GraphicsStateOperation>>;
}

impl<F> ContentParser for F
where
    F: Fn(&[u8]) -> Result<Vec<GraphicsStateOperation>> + Send + Sync,
{
    fn parse(&self, data: &[u8]) -> Result<Vec<GraphicsStateOperation>> {
        self(data)
    }
}
