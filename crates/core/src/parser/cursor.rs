//! Seekable byte cursor over raw document bytes.

/// Random-access byte reader with a single current position.
///
/// Positions are absolute byte offsets. Reading past the end yields the
/// `0` sentinel rather than an error; callers check [`ByteCursor::at_end`]
/// to distinguish a genuine NUL byte.
pub trait ByteCursor {
    /// Byte at the current position, or `0` at end of data.
    fn current_byte(&self) -> u8;

    /// Current absolute position.
    fn offset(&self) -> u64;

    /// Total length of the underlying data.
    fn len(&self) -> u64;

    /// Byte after the current position without moving.
    fn peek(&self) -> Option<u8>;

    /// Move forward one byte. No-op at end of data.
    fn advance(&mut self);

    /// Move to an absolute position, clamped to `len()`.
    fn seek(&mut self, offset: u64);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the position is at or past the end of the data.
    fn at_end(&self) -> bool {
        self.offset() >= self.len()
    }

    /// Test whether `literal` occurs at the current position.
    ///
    /// The position is unchanged afterwards regardless of the outcome.
    fn matches(&mut self, literal: &[u8]) -> bool {
        let origin = self.offset();
        let mut matched = true;
        for &expected in literal {
            if self.at_end() || self.current_byte() != expected {
                matched = false;
                break;
            }
            self.advance();
        }
        self.seek(origin);
        matched
    }
}

/// [`ByteCursor`] over any contiguous byte container (`Vec<u8>`, `Bytes`,
/// a memory map, a borrowed slice).
#[derive(Debug, Clone)]
pub struct SliceCursor<T> {
    data: T,
    pos: usize,
}

impl<T: AsRef<[u8]>> SliceCursor<T> {
    pub fn new(data: T) -> Self {
        Self { data, pos: 0 }
    }

    pub fn get_ref(&self) -> &T {
        &self.data
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}

impl<T: AsRef<[u8]>> ByteCursor for SliceCursor<T> {
    fn current_byte(&self) -> u8 {
        self.data.as_ref().get(self.pos).copied().unwrap_or(0)
    }

    fn offset(&self) -> u64 {
        self.pos as u64
    }

    fn len(&self) -> u64 {
        self.data.as_ref().len() as u64
    }

    fn peek(&self) -> Option<u8> {
        self.data.as_ref().get(self.pos + 1).copied()
    }

    fn advance(&mut self) {
        if self.pos < self.data.as_ref().len() {
            self.pos += 1;
        }
    }

    fn seek(&mut self, offset: u64) {
        let len = self.data.as_ref().len();
        self.pos = usize::try_from(offset).map_or(len, |o| o.min(len));
    }

    // Slice comparison instead of the byte-by-byte default.
    fn matches(&mut self, literal: &[u8]) -> bool {
        self.data
            .as_ref()
            .get(self.pos..)
            .is_some_and(|rest| rest.starts_with(literal))
    }
}

impl<C: ByteCursor + ?Sized> ByteCursor for &mut C {
    fn current_byte(&self) -> u8 {
        (**self).current_byte()
    }

    fn offset(&self) -> u64 {
        (**self).offset()
    }

    fn len(&self) -> u64 {
        (**self).len()
    }

    fn peek(&self) -> Option<u8> {
        (**self).peek()
    }

    fn advance(&mut self) {
        (**self).advance();
    }

    fn seek(&mut self, offset: u64) {
        (**self).seek(offset);
    }

    fn matches(&mut self, literal: &[u8]) -> bool {
        (**self).matches(literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_and_clamping() {
        let mut cursor = SliceCursor::new(b"abc".as_slice());
        cursor.seek(10);
        assert_eq!(cursor.offset(), 3);
        assert!(cursor.at_end());
        assert_eq!(cursor.current_byte(), 0);
        cursor.advance();
        assert_eq!(cursor.offset(), 3);
    }

    #[test]
    fn matches_does_not_move() {
        let mut cursor = SliceCursor::new(b"1 0 obj".to_vec());
        cursor.seek(3);
        assert!(cursor.matches(b" obj"));
        assert!(!cursor.matches(b" obj!"));
        assert_eq!(cursor.offset(), 3);
    }

    #[test]
    fn peek_looks_one_ahead() {
        let mut cursor = SliceCursor::new(b"xy");
        assert_eq!(cursor.peek(), Some(b'y'));
        cursor.advance();
        assert_eq!(cursor.peek(), None);
    }

    /// Cursor using only the provided `matches`.
    struct Plain(SliceCursor<Vec<u8>>);

    impl ByteCursor for Plain {
        fn current_byte(&self) -> u8 {
            self.0.current_byte()
        }
        fn offset(&self) -> u64 {
            self.0.offset()
        }
        fn len(&self) -> u64 {
            self.0.len()
        }
        fn peek(&self) -> Option<u8> {
            self.0.peek()
        }
        fn advance(&mut self) {
            self.0.advance();
        }
        fn seek(&mut self, offset: u64) {
            self.0.seek(offset);
        }
    }

    #[test]
    fn provided_matches_restores_position() {
        let mut cursor = Plain(SliceCursor::new(b"endobj".to_vec()));
        assert!(cursor.matches(b"endobj"));
        assert!(!cursor.matches(b"endobjx"));
        assert_eq!(cursor.offset(), 0);
    }
}
