//! `/ToUnicode` CMap parsing.
//!
//! Only the `bfchar` and `bfrange` sections are read; everything else in
//! the CMap program is skipped.

use crate::codec::ascii85::asciihexdecode;
use rustc_hash::FxHashMap;

/// Character code to Unicode mapping from a `/ToUnicode` stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToUnicodeMap {
    code2unichr: FxHashMap<u32, String>,
}

impl ToUnicodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: u32, text: String) {
        self.code2unichr.insert(code, text);
    }

    pub fn get(&self, code: u32) -> Option<&str> {
        self.code2unichr.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.code2unichr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code2unichr.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    Hex(&'a [u8]),
    ArrayStart,
    ArrayEnd,
    Word(&'a [u8]),
}

fn tokenize(data: &[u8]) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < data.len() {
        match data[i] {
            b'<' => {
                let start = i + 1;
                let end = data[start..]
                    .iter()
                    .position(|&b| b == b'>')
                    .map_or(data.len(), |p| start + p);
                tokens.push(Token::Hex(&data[start..end]));
                i = end + 1;
            }
            b'[' => {
                tokens.push(Token::ArrayStart);
                i += 1;
            }
            b']' => {
                tokens.push(Token::ArrayEnd);
                i += 1;
            }
            b'%' => {
                while i < data.len() && data[i] != b'\n' && data[i] != b'\r' {
                    i += 1;
                }
            }
            b if b.is_ascii_whitespace() => i += 1,
            _ => {
                let start = i;
                while i < data.len()
                    && !data[i].is_ascii_whitespace()
                    && !matches!(data[i], b'<' | b'[' | b']' | b'%')
                {
                    i += 1;
                }
                tokens.push(Token::Word(&data[start..i]));
            }
        }
    }
    tokens
}

fn code_value(digits: &[u8]) -> Option<u32> {
    let bytes = asciihexdecode(digits).ok()?;
    if bytes.is_empty() || bytes.len() > 4 {
        return None;
    }
    Some(bytes.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b)))
}

fn utf16be_text(digits: &[u8]) -> Option<Vec<u16>> {
    let bytes = asciihexdecode(digits).ok()?;
    Some(
        bytes
            .chunks(2)
            .map(|pair| match pair {
                [hi, lo] => u16::from_be_bytes([*hi, *lo]),
                [single] => u16::from(*single),
                _ => 0,
            })
            .collect(),
    )
}

/// Parse the body of a `/ToUnicode` stream.
///
/// Malformed entries are skipped.
pub fn parse_tounicode_cmap(data: &[u8]) -> ToUnicodeMap {
    let mut map = ToUnicodeMap::new();
    let tokens = tokenize(data);
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i] {
            Token::Word(b"beginbfchar") => {
                i += 1;
                while i + 1 < tokens.len() {
                    let (Token::Hex(src), Token::Hex(dst)) = (&tokens[i], &tokens[i + 1]) else {
                        break;
                    };
                    if let (Some(code), Some(units)) = (code_value(src), utf16be_text(dst)) {
                        map.insert(code, String::from_utf16_lossy(&units));
                    }
                    i += 2;
                }
            }
            Token::Word(b"beginbfrange") => {
                i += 1;
                while i + 2 < tokens.len() {
                    let (Token::Hex(lo), Token::Hex(hi)) = (&tokens[i], &tokens[i + 1]) else {
                        break;
                    };
                    let (Some(start), Some(end)) = (code_value(lo), code_value(hi)) else {
                        i += 3;
                        continue;
                    };
                    match &tokens[i + 2] {
                        Token::Hex(dst) => {
                            if let Some(units) = utf16be_text(dst) {
                                insert_incrementing(&mut map, start, end, units);
                            }
                            i += 3;
                        }
                        Token::ArrayStart => {
                            i += 3;
                            let mut code = start;
                            while let Some(Token::Hex(dst)) = tokens.get(i) {
                                if code <= end
                                    && let Some(units) = utf16be_text(dst)
                                {
                                    map.insert(code, String::from_utf16_lossy(&units));
                                }
                                code = code.saturating_add(1);
                                i += 1;
                            }
                            if tokens.get(i) == Some(&Token::ArrayEnd) {
                                i += 1;
                            }
                        }
                        _ => break,
                    }
                }
            }
            _ => i += 1,
        }
    }

    map
}

/// Map `start..=end` to consecutive values, incrementing the last UTF-16 unit.
fn insert_incrementing(map: &mut ToUnicodeMap, start: u32, end: u32, units: Vec<u16>) {
    if end < start || end - start > 0xFFFF {
        return;
    }
    let Some((&last, prefix)) = units.split_last() else {
        return;
    };
    for (offset, code) in (start..=end).enumerate() {
        let mut value = prefix.to_vec();
        value.push(last.wrapping_add(offset as u16));
        map.insert(code, String::from_utf16_lossy(&value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CMAP: &[u8] = b"/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
1 begincodespacerange <0000> <FFFF> endcodespacerange
2 beginbfchar
<0003> <0020>
<0011><002E>
endbfchar
2 beginbfrange
<0024> <0026> <0041>
<0030> <0031> [<00660069> <00660066>]
endbfrange
endcmap";

    #[test]
    fn bfchar_entries() {
        let map = parse_tounicode_cmap(CMAP);
        assert_eq!(map.get(3), Some(" "));
        assert_eq!(map.get(0x11), Some("."));
    }

    #[test]
    fn bfrange_increments() {
        let map = parse_tounicode_cmap(CMAP);
        assert_eq!(map.get(0x24), Some("A"));
        assert_eq!(map.get(0x26), Some("C"));
        assert_eq!(map.get(0x27), None);
    }

    #[test]
    fn bfrange_array_form() {
        let map = parse_tounicode_cmap(CMAP);
        assert_eq!(map.get(0x30), Some("fi"));
        assert_eq!(map.get(0x31), Some("ff"));
    }
}
