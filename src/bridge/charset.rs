//! FidoNet CHRS charset table
//!
//! CHRS kludges name a charset by an identifier token plus a level
//! (`CP866 2`, `UTF-8 4`). [`Charset`] covers the identifiers seen in
//! practice, including the obsolete ones (`IBMPC`, `MAC`, `+7_FIDO`, `CP848`).

use encoding_rs::Encoding;
use oem_cp::code_table::{
    DECODING_TABLE_CP437, DECODING_TABLE_CP850, DECODING_TABLE_CP852, ENCODING_TABLE_CP437,
    ENCODING_TABLE_CP850, ENCODING_TABLE_CP852,
};
use oem_cp::{decode_string_complete_table, encode_string_checked, encode_string_lossy};
use tracing::debug;

/// Text encodings a FidoNet message can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Charset {
    /// 7-bit ASCII
    Ascii,
    /// IBM PC (the FidoNet default)
    #[default]
    Cp437,
    /// DOS Latin-1
    Cp850,
    /// DOS Latin-2
    Cp852,
    /// DOS Cyrillic (alternative code page)
    Cp866,
    /// Windows Central European
    Cp1250,
    /// Windows Cyrillic
    Cp1251,
    /// Windows Western
    Cp1252,
    /// ISO-8859-1
    Latin1,
    /// ISO-8859-2
    Latin2,
    /// ISO-8859-9
    Latin5,
    /// ISO-8859-15
    Latin9,
    /// Macintosh Roman
    MacRoman,
    /// UTF-8
    Utf8,
}

impl Charset {
    /// Look up a CHRS identifier such as `"CP866 2"` or `"LATIN-1"`
    ///
    /// Only the first token is significant; the level is ignored.
    pub fn from_chrs(value: &str) -> Option<Charset> {
        let ident = value.split_whitespace().next()?.to_ascii_uppercase();
        let charset = match ident.as_str() {
            "ASCII" | "US-ASCII" => Charset::Ascii,
            "CP437" | "IBMPC" | "IBM437" => Charset::Cp437,
            "CP850" => Charset::Cp850,
            "CP852" => Charset::Cp852,
            // CP848 is CP866 with Ukrainian letters in the upper rows
            "CP866" | "CP848" | "+7_FIDO" | "+7" | "ALT" => Charset::Cp866,
            "CP1250" => Charset::Cp1250,
            "CP1251" => Charset::Cp1251,
            "CP1252" => Charset::Cp1252,
            "LATIN-1" | "LATIN1" | "ISO-8859-1" => Charset::Latin1,
            "LATIN-2" | "LATIN2" | "ISO-8859-2" => Charset::Latin2,
            "LATIN-5" | "LATIN5" | "ISO-8859-9" => Charset::Latin5,
            "LATIN-9" | "LATIN9" | "ISO-8859-15" => Charset::Latin9,
            "MAC" | "CP10000" => Charset::MacRoman,
            "UTF-8" | "UTF8" => Charset::Utf8,
            _ => return None,
        };
        Some(charset)
    }

    /// Charset for a message's CHRS kludge, CP437 when absent or unknown
    pub fn from_kludge(value: Option<&str>) -> Charset {
        match value {
            Some(v) => Charset::from_chrs(v).unwrap_or_else(|| {
                debug!("Unknown CHRS {:?}, falling back to CP437", v);
                Charset::Cp437
            }),
            None => Charset::Cp437,
        }
    }

    /// Look up a MIME `charset=` label as used in article headers
    pub fn from_mime_label(label: &str) -> Option<Charset> {
        let label = label.trim().trim_matches('"').to_ascii_lowercase();
        match label.as_str() {
            "us-ascii" | "ascii" => return Some(Charset::Ascii),
            "ibm437" | "cp437" | "437" => return Some(Charset::Cp437),
            "ibm850" | "cp850" | "850" => return Some(Charset::Cp850),
            "ibm852" | "cp852" | "852" => return Some(Charset::Cp852),
            // WHATWG folds these into windows-1252; keep the real mapping
            "iso-8859-1" | "iso8859-1" | "latin1" | "l1" => return Some(Charset::Latin1),
            // and ISO-8859-9 into windows-1254
            "iso-8859-9" | "iso8859-9" | "latin5" | "l5" => return Some(Charset::Latin5),
            _ => {}
        }

        let encoding = Encoding::for_label(label.as_bytes())?;
        [
            (encoding_rs::WINDOWS_1250, Charset::Cp1250),
            (encoding_rs::WINDOWS_1251, Charset::Cp1251),
            (encoding_rs::WINDOWS_1252, Charset::Cp1252),
            (encoding_rs::ISO_8859_2, Charset::Latin2),
            (encoding_rs::ISO_8859_15, Charset::Latin9),
            (encoding_rs::IBM866, Charset::Cp866),
            (encoding_rs::MACINTOSH, Charset::MacRoman),
            (encoding_rs::UTF_8, Charset::Utf8),
        ]
        .into_iter()
        .find(|(candidate, _)| *candidate == encoding)
        .map(|(_, charset)| charset)
    }

    /// Identifier token written into a CHRS kludge
    pub fn chrs_identifier(self) -> &'static str {
        match self {
            Charset::Ascii => "ASCII",
            Charset::Cp437 => "CP437",
            Charset::Cp850 => "CP850",
            Charset::Cp852 => "CP852",
            Charset::Cp866 => "CP866",
            Charset::Cp1250 => "CP1250",
            Charset::Cp1251 => "CP1251",
            Charset::Cp1252 => "CP1252",
            Charset::Latin1 => "LATIN-1",
            Charset::Latin2 => "LATIN-2",
            Charset::Latin5 => "LATIN-5",
            Charset::Latin9 => "LATIN-9",
            Charset::MacRoman => "MAC",
            Charset::Utf8 => "UTF-8",
        }
    }

    /// CHRS level: 1 for 7-bit, 4 for UTF-8, 2 otherwise
    pub fn level(self) -> u8 {
        match self {
            Charset::Ascii => 1,
            Charset::Utf8 => 4,
            _ => 2,
        }
    }

    /// Full CHRS kludge value, e.g. `"CP437 2"`
    pub fn chrs_value(self) -> String {
        format!("{} {}", self.chrs_identifier(), self.level())
    }

    /// Name for a MIME `charset=` parameter
    pub fn mime_name(self) -> &'static str {
        match self {
            Charset::Ascii => "us-ascii",
            Charset::Cp437 => "IBM437",
            Charset::Cp850 => "IBM850",
            Charset::Cp852 => "IBM852",
            Charset::Cp866 => "IBM866",
            Charset::Cp1250 => "windows-1250",
            Charset::Cp1251 => "windows-1251",
            Charset::Cp1252 => "windows-1252",
            Charset::Latin1 => "ISO-8859-1",
            Charset::Latin2 => "ISO-8859-2",
            Charset::Latin5 => "ISO-8859-9",
            Charset::Latin9 => "ISO-8859-15",
            Charset::MacRoman => "macintosh",
            Charset::Utf8 => "UTF-8",
        }
    }

    fn encoding(self) -> Option<&'static Encoding> {
        match self {
            Charset::Cp866 => Some(encoding_rs::IBM866),
            Charset::Cp1250 => Some(encoding_rs::WINDOWS_1250),
            Charset::Cp1251 => Some(encoding_rs::WINDOWS_1251),
            Charset::Cp1252 => Some(encoding_rs::WINDOWS_1252),
            Charset::Latin2 => Some(encoding_rs::ISO_8859_2),
            Charset::Latin9 => Some(encoding_rs::ISO_8859_15),
            Charset::MacRoman => Some(encoding_rs::MACINTOSH),
            Charset::Utf8 => Some(encoding_rs::UTF_8),
            Charset::Ascii
            | Charset::Cp437
            | Charset::Cp850
            | Charset::Cp852
            | Charset::Latin1
            | Charset::Latin5 => None,
        }
    }

    /// Decode bytes, replacing anything undecodable
    ///
    /// The flag is `true` when replacement characters had to be inserted.
    pub fn decode(self, bytes: &[u8]) -> (String, bool) {
        match self {
            Charset::Ascii => {
                let lossy = !bytes.is_ascii();
                let text = bytes
                    .iter()
                    .map(|&b| if b.is_ascii() { b as char } else { '\u{FFFD}' })
                    .collect();
                (text, lossy)
            }
            Charset::Latin1 => (bytes.iter().map(|&b| b as char).collect(), false),
            Charset::Latin5 => (bytes.iter().map(|&b| latin5_char(b)).collect(), false),
            Charset::Cp437 => (decode_string_complete_table(bytes, &DECODING_TABLE_CP437), false),
            Charset::Cp850 => (decode_string_complete_table(bytes, &DECODING_TABLE_CP850), false),
            Charset::Cp852 => (decode_string_complete_table(bytes, &DECODING_TABLE_CP852), false),
            _ => match self.encoding() {
                Some(encoding) => {
                    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
                    (text.into_owned(), had_errors)
                }
                None => (String::from_utf8_lossy(bytes).into_owned(), false),
            },
        }
    }

    /// Encode text, or `None` if any character has no representation
    pub fn encode(self, text: &str) -> Option<Vec<u8>> {
        match self {
            Charset::Ascii => text.is_ascii().then(|| text.as_bytes().to_vec()),
            Charset::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).ok())
                .collect(),
            Charset::Latin5 => text.chars().map(latin5_byte).collect(),
            Charset::Cp437 => encode_string_checked(text, &ENCODING_TABLE_CP437),
            Charset::Cp850 => encode_string_checked(text, &ENCODING_TABLE_CP850),
            Charset::Cp852 => encode_string_checked(text, &ENCODING_TABLE_CP852),
            _ => {
                let encoding = self.encoding()?;
                let (bytes, _, unmappable) = encoding.encode(text);
                (!unmappable).then(|| bytes.into_owned())
            }
        }
    }

    /// Encode text, writing `?` for unrepresentable characters
    pub fn encode_lossy(self, text: &str) -> Vec<u8> {
        if let Some(bytes) = self.encode(text) {
            return bytes;
        }
        match self {
            Charset::Cp437 => encode_string_lossy(text, &ENCODING_TABLE_CP437),
            Charset::Cp850 => encode_string_lossy(text, &ENCODING_TABLE_CP850),
            Charset::Cp852 => encode_string_lossy(text, &ENCODING_TABLE_CP852),
            _ => {
                let mut out = Vec::with_capacity(text.len());
                let mut buf = [0u8; 4];
                for ch in text.chars() {
                    match self.encode(ch.encode_utf8(&mut buf)) {
                        Some(bytes) => out.extend_from_slice(&bytes),
                        None => out.push(b'?'),
                    }
                }
                out
            }
        }
    }
}

/// Bytes where ISO-8859-9 differs from ISO-8859-1
///
/// Everything else, C1 controls at 0x80-0x9F included, maps straight to the
/// code point of the same value.
const LATIN5_TURKISH: [(u8, char); 6] = [
    (0xD0, 'Ğ'),
    (0xDD, 'İ'),
    (0xDE, 'Ş'),
    (0xF0, 'ğ'),
    (0xFD, 'ı'),
    (0xFE, 'ş'),
];

fn latin5_char(byte: u8) -> char {
    LATIN5_TURKISH
        .iter()
        .find(|(b, _)| *b == byte)
        .map_or(byte as char, |(_, c)| *c)
}

fn latin5_byte(c: char) -> Option<u8> {
    if let Some((b, _)) = LATIN5_TURKISH.iter().find(|(_, t)| *t == c) {
        return Some(*b);
    }
    let byte = u8::try_from(u32::from(c)).ok()?;
    // the Latin-1 letters these positions held are not in Latin-5
    (!LATIN5_TURKISH.iter().any(|(b, _)| *b == byte)).then_some(byte)
}

/// Pick the narrowest charset that represents `text` without loss
///
/// Tries ASCII, CP437, CP1252 and finally UTF-8, returning the charset and
/// its CHRS level.
///
/// ```
/// use ftngate::bridge::{best_charset, Charset};
///
/// assert_eq!(best_charset("plain"), (Charset::Ascii, 1));
/// assert_eq!(best_charset("Grüße"), (Charset::Cp437, 2));
/// assert_eq!(best_charset("naïve €5"), (Charset::Cp1252, 2));
/// assert_eq!(best_charset("Привет ✓"), (Charset::Utf8, 4));
/// ```
pub fn best_charset(text: &str) -> (Charset, u8) {
    [Charset::Ascii, Charset::Cp437, Charset::Cp1252]
        .into_iter()
        .find(|charset| charset.encode(text).is_some())
        .map(|charset| (charset, charset.level()))
        .unwrap_or((Charset::Utf8, Charset::Utf8.level()))
}
