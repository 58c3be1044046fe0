//! RFC 2047 encoded words
//!
//! Article headers carry non-ASCII text as `=?charset?encoding?text?=`.
//! Decoding is used on fetched articles (From, Subject); encoding on the
//! headers of articles built from FidoNet messages.
//!
//! ```
//! use ftngate::encoded_words::{decode_header_value, encode_header_value};
//!
//! assert_eq!(decode_header_value("=?ISO-8859-1?Q?M=FCnchen?="), "München");
//! assert_eq!(decode_header_value("Re: =?UTF-8?B?SGVsbG8=?= World"), "Re: Hello World");
//!
//! let encoded = encode_header_value("Привет");
//! assert!(encoded.starts_with("=?UTF-8?B?"));
//! assert_eq!(decode_header_value(&encoded), "Привет");
//! ```

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use tracing::trace;

use crate::bridge::Charset;

/// Longest encoded word allowed by RFC 2047
const MAX_ENCODED_WORD: usize = 75;

/// Decode a single encoded word, or return the input unchanged
///
/// ```
/// use ftngate::encoded_words::decode_encoded_word;
///
/// assert_eq!(decode_encoded_word("=?windows-1251?B?z/Du4uXw6uA=?="), "Проверка");
/// assert_eq!(decode_encoded_word("plain"), "plain");
/// ```
pub fn decode_encoded_word(encoded: &str) -> String {
    decode_word(encoded).unwrap_or_else(|| encoded.to_string())
}

fn decode_word(encoded: &str) -> Option<String> {
    let inner = encoded.strip_prefix("=?")?.strip_suffix("?=")?;
    let mut parts = inner.splitn(3, '?');
    let (label, encoding, text) = (parts.next()?, parts.next()?, parts.next()?);

    // RFC 2231 language suffix: charset*lang
    let label = label.split('*').next().unwrap_or(label);

    let bytes = match encoding {
        "B" | "b" => BASE64.decode(text).ok()?,
        "Q" | "q" => decode_q(text),
        _ => return None,
    };

    let decoded = match Charset::from_mime_label(label) {
        Some(charset) => charset.decode(&bytes).0,
        None => {
            trace!("Unknown charset {:?} in encoded word", label);
            String::from_utf8_lossy(&bytes).into_owned()
        }
    };
    Some(decoded)
}

/// Decode a header value containing any mix of encoded words and text
///
/// Whitespace between adjacent encoded words is dropped. Text that only
/// looks like an encoded word is kept verbatim.
pub fn decode_header_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut pending_space = String::new();
    let mut last_was_encoded = false;
    let mut rest = value;

    while !rest.is_empty() {
        if rest.starts_with("=?") {
            if let Some(end) = find_encoded_word_end(rest) {
                if let Some(decoded) = decode_word(&rest[..end]) {
                    if !last_was_encoded {
                        result.push_str(&pending_space);
                    }
                    pending_space.clear();
                    result.push_str(&decoded);
                    last_was_encoded = true;
                    rest = &rest[end..];
                    continue;
                }
            }
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        if ch == ' ' || ch == '\t' {
            pending_space.push(ch);
        } else {
            result.push_str(&pending_space);
            pending_space.clear();
            result.push(ch);
            last_was_encoded = false;
        }
        rest = &rest[ch.len_utf8()..];
    }

    result.push_str(&pending_space);
    result
}

/// Byte index just past the closing `?=` of an encoded word at the start
fn find_encoded_word_end(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut questions = 0;

    for i in 2..bytes.len() {
        match bytes[i] {
            b'?' => {
                questions += 1;
                if questions >= 3 && bytes.get(i + 1) == Some(&b'=') {
                    return Some(i + 2);
                }
            }
            b' ' | b'\t' => return None,
            _ => {}
        }
    }
    None
}

/// Q encoding: `_` is a space, `=XX` a byte
fn decode_q(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'_' => out.push(b' '),
            b'=' => {
                let hex = bytes
                    .get(i + 1..i + 3)
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                match hex {
                    Some(byte) => {
                        out.push(byte);
                        i += 2;
                    }
                    None => out.push(b'='),
                }
            }
            other => out.push(other),
        }
        i += 1;
    }
    out
}

/// Encode a header value as UTF-8 B-words when it is not plain ASCII
///
/// ASCII values are returned unchanged. Long values are split into several
/// encoded words on character boundaries, separated by a space.
pub fn encode_header_value(value: &str) -> String {
    if value.is_ascii() {
        return value.to_string();
    }

    const PREFIX: &str = "=?UTF-8?B?";
    const SUFFIX: &str = "?=";
    // Raw bytes per word so that the base64 text fits in the word limit
    let max_raw = (MAX_ENCODED_WORD - PREFIX.len() - SUFFIX.len()) / 4 * 3;

    let mut words = Vec::new();
    let mut chunk = String::new();
    for ch in value.chars() {
        if chunk.len() + ch.len_utf8() > max_raw {
            words.push(format!("{PREFIX}{}{SUFFIX}", BASE64.encode(&chunk)));
            chunk.clear();
        }
        chunk.push(ch);
    }
    if !chunk.is_empty() {
        words.push(format!("{PREFIX}{}{SUFFIX}", BASE64.encode(&chunk)));
    }
    words.join(" ")
}
