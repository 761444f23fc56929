//! Base encodings for simple fonts and glyph-name lookup.
//!
//! Glyph names follow the Adobe Glyph List conventions: `uniXXXX`,
//! `uXXXX[XX]`, single-character names and a table of the common names.

/// The predefined single-byte encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseEncoding {
    #[default]
    Standard,
    WinAnsi,
    MacRoman,
    PdfDoc,
}

impl BaseEncoding {
    /// Encoding for an `/Encoding` or `/BaseEncoding` name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "StandardEncoding" => Some(Self::Standard),
            "WinAnsiEncoding" => Some(Self::WinAnsi),
            "MacRomanEncoding" => Some(Self::MacRoman),
            "PDFDocEncoding" => Some(Self::PdfDoc),
            _ => None,
        }
    }

    /// Unicode character for `code`, `None` where the encoding is undefined.
    pub fn to_char(self, code: u8) -> Option<char> {
        let cp = match self {
            Self::Standard => standard(code)?,
            Self::WinAnsi => win_ansi(code)?,
            Self::MacRoman => mac_roman(code)?,
            Self::PdfDoc => {
                return crate::utils::decode_text(&[code]).chars().next();
            }
        };
        char::from_u32(cp)
    }
}

fn standard(code: u8) -> Option<u32> {
    let cp = match code {
        0x27 => 0x2019,
        0x60 => 0x2018,
        0x20..=0x7E => u32::from(code),
        0xA1 => 0x00A1,
        0xA2 => 0x00A2,
        0xA3 => 0x00A3,
        0xA4 => 0x2044,
        0xA5 => 0x00A5,
        0xA6 => 0x0192,
        0xA7 => 0x00A7,
        0xA8 => 0x00A4,
        0xA9 => 0x0027,
        0xAA => 0x201C,
        0xAB => 0x00AB,
        0xAC => 0x2039,
        0xAD => 0x203A,
        0xAE => 0xFB01,
        0xAF => 0xFB02,
        0xB1 => 0x2013,
        0xB2 => 0x2020,
        0xB3 => 0x2021,
        0xB4 => 0x00B7,
        0xB6 => 0x00B6,
        0xB7 => 0x2022,
        0xB8 => 0x201A,
        0xB9 => 0x201E,
        0xBA => 0x201D,
        0xBB => 0x00BB,
        0xBC => 0x2026,
        0xBD => 0x2030,
        0xBF => 0x00BF,
        0xC1 => 0x0060,
        0xC2 => 0x00B4,
        0xC3 => 0x02C6,
        0xC4 => 0x02DC,
        0xC5 => 0x00AF,
        0xC6 => 0x02D8,
        0xC7 => 0x02D9,
        0xC8 => 0x00A8,
        0xCA => 0x02DA,
        0xCB => 0x00B8,
        0xCD => 0x02DD,
        0xCE => 0x02DB,
        0xCF => 0x02C7,
        0xD0 => 0x2014,
        0xE1 => 0x00C6,
        0xE3 => 0x00AA,
        0xE8 => 0x0141,
        0xE9 => 0x00D8,
        0xEA => 0x0152,
        0xEB => 0x00BA,
        0xF1 => 0x00E6,
        0xF5 => 0x0131,
        0xF8 => 0x0142,
        0xF9 => 0x00F8,
        0xFA => 0x0153,
        0xFB => 0x00DF,
        _ => return None,
    };
    Some(cp)
}

const WIN_ANSI_HIGH: [u32; 32] = [
    0x20AC, 0, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, 0x02C6, 0x2030, 0x0160, 0x2039,
    0x0152, 0, 0x017D, 0, 0, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, 0x02DC,
    0x2122, 0x0161, 0x203A, 0x0153, 0, 0x017E, 0x0178,
];

fn win_ansi(code: u8) -> Option<u32> {
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(u32::from(code)),
        0x80..=0x9F => Some(WIN_ANSI_HIGH[usize::from(code - 0x80)]).filter(|&cp| cp != 0),
        _ => None,
    }
}

const MAC_ROMAN_HIGH: [u32; 128] = [
    0x00C4, 0x00C5, 0x00C7, 0x00C9, 0x00D1, 0x00D6, 0x00DC, 0x00E1, 0x00E0, 0x00E2, 0x00E4,
    0x00E3, 0x00E5, 0x00E7, 0x00E9, 0x00E8, 0x00EA, 0x00EB, 0x00ED, 0x00EC, 0x00EE, 0x00EF,
    0x00F1, 0x00F3, 0x00F2, 0x00F4, 0x00F6, 0x00F5, 0x00FA, 0x00F9, 0x00FB, 0x00FC, 0x2020,
    0x00B0, 0x00A2, 0x00A3, 0x00A7, 0x2022, 0x00B6, 0x00DF, 0x00AE, 0x00A9, 0x2122, 0x00B4,
    0x00A8, 0x2260, 0x00C6, 0x00D8, 0x221E, 0x00B1, 0x2264, 0x2265, 0x00A5, 0x00B5, 0x2202,
    0x2211, 0x220F, 0x03C0, 0x222B, 0x00AA, 0x00BA, 0x03A9, 0x00E6, 0x00F8, 0x00BF, 0x00A1,
    0x00AC, 0x221A, 0x0192, 0x2248, 0x2206, 0x00AB, 0x00BB, 0x2026, 0x00A0, 0x00C0, 0x00C3,
    0x00D5, 0x0152, 0x0153, 0x2013, 0x2014, 0x201C, 0x201D, 0x2018, 0x2019, 0x00F7, 0x25CA,
    0x00FF, 0x0178, 0x2044, 0x00A4, 0x2039, 0x203A, 0xFB01, 0xFB02, 0x2021, 0x00B7, 0x201A,
    0x201E, 0x2030, 0x00C2, 0x00CA, 0x00C1, 0x00CB, 0x00C8, 0x00CD, 0x00CE, 0x00CF, 0x00CC,
    0x00D3, 0x00D4, 0xF8FF, 0x00D2, 0x00DA, 0x00DB, 0x00D9, 0x0131, 0x02C6, 0x02DC, 0x00AF,
    0x02D8, 0x02D9, 0x02DA, 0x00B8, 0x02DD, 0x02DB, 0x02C7,
];

fn mac_roman(code: u8) -> Option<u32> {
    match code {
        0x20..=0x7E => Some(u32::from(code)),
        0x80..=0xFF => Some(MAC_ROMAN_HIGH[usize::from(code - 0x80)]),
        _ => None,
    }
}

const GLYPH_NAMES: &[(&str, char)] = &[
    ("space", ' '),
    ("exclam", '!'),
    ("quotedbl", '"'),
    ("numbersign", '#'),
    ("dollar", '$'),
    ("percent", '%'),
    ("ampersand", '&'),
    ("quotesingle", '\''),
    ("parenleft", '('),
    ("parenright", ')'),
    ("asterisk", '*'),
    ("plus", '+'),
    ("comma", ','),
    ("hyphen", '-'),
    ("period", '.'),
    ("slash", '/'),
    ("zero", '0'),
    ("one", '1'),
    ("two", '2'),
    ("three", '3'),
    ("four", '4'),
    ("five", '5'),
    ("six", '6'),
    ("seven", '7'),
    ("eight", '8'),
    ("nine", '9'),
    ("colon", ':'),
    ("semicolon", ';'),
    ("less", '<'),
    ("equal", '='),
    ("greater", '>'),
    ("question", '?'),
    ("at", '@'),
    ("bracketleft", '['),
    ("backslash", '\\'),
    ("bracketright", ']'),
    ("asciicircum", '^'),
    ("underscore", '_'),
    ("grave", '`'),
    ("braceleft", '{'),
    ("bar", '|'),
    ("braceright", '}'),
    ("asciitilde", '~'),
    ("quoteleft", '\u{2018}'),
    ("quoteright", '\u{2019}'),
    ("quotedblleft", '\u{201C}'),
    ("quotedblright", '\u{201D}'),
    ("quotesinglbase", '\u{201A}'),
    ("quotedblbase", '\u{201E}'),
    ("endash", '\u{2013}'),
    ("emdash", '\u{2014}'),
    ("bullet", '\u{2022}'),
    ("ellipsis", '\u{2026}'),
    ("dagger", '\u{2020}'),
    ("daggerdbl", '\u{2021}'),
    ("perthousand", '\u{2030}'),
    ("trademark", '\u{2122}'),
    ("copyright", '\u{A9}'),
    ("registered", '\u{AE}'),
    ("degree", '\u{B0}'),
    ("section", '\u{A7}'),
    ("paragraph", '\u{B6}'),
    ("periodcentered", '\u{B7}'),
    ("guillemotleft", '\u{AB}'),
    ("guillemotright", '\u{BB}'),
    ("guilsinglleft", '\u{2039}'),
    ("guilsinglright", '\u{203A}'),
    ("minus", '\u{2212}'),
    ("multiply", '\u{D7}'),
    ("divide", '\u{F7}'),
    ("plusminus", '\u{B1}'),
    ("fi", '\u{FB01}'),
    ("fl", '\u{FB02}'),
    ("Euro", '\u{20AC}'),
    ("sterling", '\u{A3}'),
    ("yen", '\u{A5}'),
    ("cent", '\u{A2}'),
    ("florin", '\u{192}'),
    ("nbspace", '\u{A0}'),
    ("germandbls", '\u{DF}'),
    ("dotlessi", '\u{131}'),
    ("AE", '\u{C6}'),
    ("ae", '\u{E6}'),
    ("OE", '\u{152}'),
    ("oe", '\u{153}'),
    ("Oslash", '\u{D8}'),
    ("oslash", '\u{F8}'),
    ("Lslash", '\u{141}'),
    ("lslash", '\u{142}'),
];

/// Diacritic suffixes of composed Latin glyph names (`eacute`, `Udieresis`).
const ACCENTS: &[(&str, char)] = &[
    ("acute", '\u{301}'),
    ("grave", '\u{300}'),
    ("circumflex", '\u{302}'),
    ("tilde", '\u{303}'),
    ("dieresis", '\u{308}'),
    ("ring", '\u{30A}'),
    ("cedilla", '\u{327}'),
    ("caron", '\u{30C}'),
];

/// Unicode text for a glyph name.
pub fn name2unicode(name: &str) -> Option<String> {
    let name = name.split('.').next().unwrap_or(name);
    if name.is_empty() || name == "notdef" {
        return None;
    }

    if let Some(hex) = name.strip_prefix("uni")
        && hex.len() >= 4
        && hex.len() % 4 == 0
        && hex.bytes().all(|b| b.is_ascii_hexdigit())
    {
        let units: Vec<u16> = hex
            .as_bytes()
            .chunks(4)
            .filter_map(|c| std::str::from_utf8(c).ok())
            .filter_map(|c| u16::from_str_radix(c, 16).ok())
            .collect();
        return Some(String::from_utf16_lossy(&units));
    }
    if let Some(hex) = name.strip_prefix('u')
        && (4..=6).contains(&hex.len())
        && hex.bytes().all(|b| b.is_ascii_hexdigit())
    {
        return u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from);
    }

    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next())
        && c.is_ascii_alphanumeric()
    {
        return Some(c.to_string());
    }

    if let Some(&(_, c)) = GLYPH_NAMES.iter().find(|(n, _)| *n == name) {
        return Some(c.to_string());
    }

    compose_accented(name)
}

fn compose_accented(name: &str) -> Option<String> {
    let mut chars = name.chars();
    let base = chars.next().filter(char::is_ascii_alphabetic)?;
    let suffix = chars.as_str();
    let (_, mark) = ACCENTS.iter().find(|(s, _)| *s == suffix)?;
    compose(base, *mark).map(String::from)
}

/// Canonical composition for the Latin-1 and Latin Extended-A letters.
fn compose(base: char, mark: char) -> Option<char> {
    const TABLE: &[(char, char, char)] = &[
        ('A', '\u{300}', 'À'), ('A', '\u{301}', 'Á'), ('A', '\u{302}', 'Â'), ('A', '\u{303}', 'Ã'),
        ('A', '\u{308}', 'Ä'), ('A', '\u{30A}', 'Å'), ('C', '\u{327}', 'Ç'), ('E', '\u{300}', 'È'),
        ('E', '\u{301}', 'É'), ('E', '\u{302}', 'Ê'), ('E', '\u{308}', 'Ë'), ('I', '\u{300}', 'Ì'),
        ('I', '\u{301}', 'Í'), ('I', '\u{302}', 'Î'), ('I', '\u{308}', 'Ï'), ('N', '\u{303}', 'Ñ'),
        ('O', '\u{300}', 'Ò'), ('O', '\u{301}', 'Ó'), ('O', '\u{302}', 'Ô'), ('O', '\u{303}', 'Õ'),
        ('O', '\u{308}', 'Ö'), ('U', '\u{300}', 'Ù'), ('U', '\u{301}', 'Ú'), ('U', '\u{302}', 'Û'),
        ('U', '\u{308}', 'Ü'), ('Y', '\u{301}', 'Ý'), ('Y', '\u{308}', 'Ÿ'), ('S', '\u{30C}', 'Š'),
        ('Z', '\u{30C}', 'Ž'), ('C', '\u{30C}', 'Č'), ('a', '\u{300}', 'à'), ('a', '\u{301}', 'á'),
        ('a', '\u{302}', 'â'), ('a', '\u{303}', 'ã'), ('a', '\u{308}', 'ä'), ('a', '\u{30A}', 'å'),
        ('c', '\u{327}', 'ç'), ('e', '\u{300}', 'è'), ('e', '\u{301}', 'é'), ('e', '\u{302}', 'ê'),
        ('e', '\u{308}', 'ë'), ('i', '\u{300}', 'ì'), ('i', '\u{301}', 'í'), ('i', '\u{302}', 'î'),
        ('i', '\u{308}', 'ï'), ('n', '\u{303}', 'ñ'), ('o', '\u{300}', 'ò'), ('o', '\u{301}', 'ó'),
        ('o', '\u{302}', 'ô'), ('o', '\u{303}', 'õ'), ('o', '\u{308}', 'ö'), ('u', '\u{300}', 'ù'),
        ('u', '\u{301}', 'ú'), ('u', '\u{302}', 'û'), ('u', '\u{308}', 'ü'), ('y', '\u{301}', 'ý'),
        ('y', '\u{308}', 'ÿ'), ('s', '\u{30C}', 'š'), ('z', '\u{30C}', 'ž'), ('c', '\u{30C}', 'č'),
    ];
    TABLE
        .iter()
        .find(|(b, m, _)| *b == base && *m == mark)
        .map(|(_, _, c)| *c)
}
