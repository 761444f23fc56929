//! Brute-force object location.
//!
//! Rebuilds an object offset table by scanning raw document bytes for
//! `N G obj` headers when the cross-reference data is missing or cannot be
//! trusted. The scan is a two-state machine ([`ScanState`]) advanced one
//! step at a time by [`scan_step`]; [`locate_objects`] drives it between
//! the minimum header offset and the last `%%EOF` marker.

use crate::error::{PdfError, Result};
use crate::model::objects::PDFObjRef;
use crate::parser::cursor::ByteCursor;
use rustc_hash::FxHashMap;
use std::ops::{Deref, DerefMut};

const OBJ_KEYWORD: &[u8] = b" obj";
const ENDOBJ_KEYWORD: &[u8] = b"endobj";
const EOF_MARKER: &[u8] = b"%%EOF";

/// Parameters for the brute-force scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Consecutive steps without progress before the scan is abandoned.
    pub max_unproductive_steps: usize,

    /// Lowest offset at which a header digit may appear. Nothing before
    /// the `%PDF-` signature can belong to an object.
    pub minimum_offset: u64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_unproductive_steps: 1_000_000,
            minimum_offset: 6,
        }
    }
}

/// Where the scanner is relative to object boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Looking for the next `N G obj` header.
    ScanningForHeader,
    /// Inside an object body, looking for `endobj`.
    InsideObject,
}

/// Result of a single [`scan_step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub state: ScanState,
    /// Unproductive-step counter to pass to the next step.
    pub steps: usize,
    /// Header recognized during this step, with the offset of its first digit.
    pub found: Option<(PDFObjRef, u64)>,
}

/// Object offsets recovered by a brute-force scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectLocations {
    offsets: FxHashMap<PDFObjRef, u64>,
}

impl ObjectLocations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `reference` at `offset`. A later header for the same object
    /// replaces the earlier one, matching incremental-update semantics.
    pub fn insert(&mut self, reference: PDFObjRef, offset: u64) {
        if let Some(previous) = self.offsets.insert(reference, offset) {
            tracing::trace!(%reference, previous, offset, "object header superseded");
        }
    }

    pub fn get(&self, reference: &PDFObjRef) -> Option<u64> {
        self.offsets.get(reference).copied()
    }

    pub fn contains(&self, reference: &PDFObjRef) -> bool {
        self.offsets.contains_key(reference)
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PDFObjRef, &u64)> {
        self.offsets.iter()
    }

    /// Entries ordered by byte offset (ties broken by reference).
    pub fn sorted_by_offset(&self) -> Vec<(PDFObjRef, u64)> {
        let mut entries: Vec<_> = self.offsets.iter().map(|(r, o)| (*r, *o)).collect();
        entries.sort_unstable_by_key(|&(reference, offset)| (offset, reference));
        entries
    }
}

impl IntoIterator for ObjectLocations {
    type Item = (PDFObjRef, u64);
    type IntoIter = std::collections::hash_map::IntoIter<PDFObjRef, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.offsets.into_iter()
    }
}

/// Seeks the wrapped cursor back to where it was found when dropped.
struct RestorePosition<'a, C: ByteCursor + ?Sized> {
    cursor: &'a mut C,
    origin: u64,
}

impl<'a, C: ByteCursor + ?Sized> RestorePosition<'a, C> {
    fn new(cursor: &'a mut C) -> Self {
        let origin = cursor.offset();
        Self { cursor, origin }
    }
}

impl<C: ByteCursor + ?Sized> Deref for RestorePosition<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.cursor
    }
}

impl<C: ByteCursor + ?Sized> DerefMut for RestorePosition<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.cursor
    }
}

impl<C: ByteCursor + ?Sized> Drop for RestorePosition<'_, C> {
    fn drop(&mut self) {
        self.cursor.seek(self.origin);
    }
}

/// Locate every `N G obj` header with the default [`ScanOptions`].
pub fn locate_objects<C: ByteCursor + ?Sized>(cursor: &mut C) -> Result<ObjectLocations> {
    locate_objects_with(cursor, &ScanOptions::default())
}

/// Locate every `N G obj` header in the document.
///
/// Scans from `options.minimum_offset` up to the last `%%EOF` marker (or
/// the end of data when there is none). The cursor position is restored
/// on every exit path.
pub fn locate_objects_with<C: ByteCursor + ?Sized>(
    cursor: &mut C,
    options: &ScanOptions,
) -> Result<ObjectLocations> {
    let mut cursor = RestorePosition::new(cursor);
    let bound = find_last_eof_marker(&mut *cursor).unwrap_or(u64::MAX);

    let mut locations = ObjectLocations::new();
    let mut state = ScanState::ScanningForHeader;
    let mut steps = 0;

    cursor.seek(options.minimum_offset);
    while cursor.offset() < bound && !cursor.at_end() {
        let transition = scan_step(&mut *cursor, state, steps, options)?;
        if let Some((reference, offset)) = transition.found {
            locations.insert(reference, offset);
        }
        state = transition.state;
        steps = transition.steps;
    }

    tracing::debug!(
        objects = locations.len(),
        bytes = cursor.len(),
        "brute-force object scan complete"
    );
    Ok(locations)
}

/// Advance the scan by one step from the cursor's current position.
///
/// `steps` counts consecutive steps without progress; the returned
/// transition carries the updated count. When it exceeds
/// `options.max_unproductive_steps` the scan fails with
/// [`PdfError::NonTermination`].
pub fn scan_step<C: ByteCursor + ?Sized>(
    cursor: &mut C,
    state: ScanState,
    steps: usize,
    options: &ScanOptions,
) -> Result<Transition> {
    if steps > options.max_unproductive_steps {
        return Err(PdfError::NonTermination {
            offset: cursor.offset(),
            steps,
        });
    }
    let steps = steps + 1;

    match state {
        ScanState::InsideObject => {
            if cursor.current_byte() != b'e' {
                cursor.advance();
                return Ok(Transition {
                    state,
                    steps: 0,
                    found: None,
                });
            }
            if cursor.peek() == Some(b'n') && cursor.matches(ENDOBJ_KEYWORD) {
                for _ in 0..ENDOBJ_KEYWORD.len() {
                    cursor.advance();
                }
                return Ok(Transition {
                    state: ScanState::ScanningForHeader,
                    steps: 0,
                    found: None,
                });
            }
            cursor.advance();
            Ok(Transition {
                state,
                steps,
                found: None,
            })
        }
        ScanState::ScanningForHeader => {
            if !cursor.matches(OBJ_KEYWORD) {
                cursor.advance();
                return Ok(Transition {
                    state,
                    steps,
                    found: None,
                });
            }

            let keyword_at = cursor.offset();
            let header = read_header(cursor, keyword_at, options.minimum_offset);
            cursor.seek(keyword_at);
            cursor.advance();

            match header {
                Some(found) => Ok(Transition {
                    state: ScanState::InsideObject,
                    steps: 0,
                    found: Some(found),
                }),
                None => {
                    tracing::trace!(offset = keyword_at, "` obj` without a valid header");
                    Ok(Transition {
                        state,
                        steps,
                        found: None,
                    })
                }
            }
        }
    }
}

/// Parse `N G` backwards from the space of ` obj` at `keyword_at`.
///
/// Returns the reference and the offset of the first object-number digit.
fn read_header<C: ByteCursor + ?Sized>(
    cursor: &mut C,
    keyword_at: u64,
    minimum_offset: u64,
) -> Option<(PDFObjRef, u64)> {
    let (gen_start, genno) = read_digits_backward(cursor, keyword_at, minimum_offset)?;
    let separator = gen_start.checked_sub(1)?;
    cursor.seek(separator);
    if !is_pdf_whitespace(cursor.current_byte()) {
        return None;
    }
    let (obj_start, objid) = read_digits_backward(cursor, separator, minimum_offset)?;
    let genno = u32::try_from(genno).ok()?;
    Some((PDFObjRef::new(objid, genno), obj_start))
}

/// Read the run of ASCII digits ending just before `end`.
///
/// Returns the offset of the first digit and the decimal value, or `None`
/// for an empty run or an overflowing value.
fn read_digits_backward<C: ByteCursor + ?Sized>(
    cursor: &mut C,
    end: u64,
    minimum_offset: u64,
) -> Option<(u64, u64)> {
    let mut start = end;
    while start > minimum_offset {
        cursor.seek(start - 1);
        if !cursor.current_byte().is_ascii_digit() {
            break;
        }
        start -= 1;
    }
    if start == end {
        return None;
    }

    cursor.seek(start);
    let mut value: u64 = 0;
    for _ in start..end {
        let digit = u64::from(cursor.current_byte() - b'0');
        value = value.checked_mul(10)?.checked_add(digit)?;
        cursor.advance();
    }
    Some((start, value))
}

/// PDF white-space characters (ISO 32000-1, Table 1).
const fn is_pdf_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c' | b'\0')
}

/// Offset of the last `%%EOF` marker, scanning backward from the tail.
///
/// The cursor position is unchanged afterwards.
pub fn find_last_eof_marker<C: ByteCursor + ?Sized>(cursor: &mut C) -> Option<u64> {
    let origin = cursor.offset();
    let last_start = cursor.len().checked_sub(EOF_MARKER.len() as u64)?;

    let mut found = None;
    for candidate in (0..=last_start).rev() {
        cursor.seek(candidate);
        if cursor.matches(EOF_MARKER) {
            found = Some(candidate);
            break;
        }
    }

    cursor.seek(origin);
    found
}
