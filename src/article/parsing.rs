//! Article parsing functions
//!
//! Turns the raw bytes of an ARTICLE response into an [`NntpArticle`]:
//! header unfolding, transfer decoding, charset conversion and extraction
//! of the plain-text parts of MIME multipart bodies.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use tracing::{debug, trace};

use super::types::{Headers, NntpArticle, content_type_param};
use crate::bridge::Charset;

/// Split raw article bytes at the first blank line
///
/// Accepts CRLF and bare LF line endings. Without a blank line the whole
/// input is headers.
pub fn split_article(raw: &[u8]) -> (&[u8], &[u8]) {
    let crlf = find(raw, b"\r\n\r\n").map(|pos| (pos, 4));
    let lf = find(raw, b"\n\n").map(|pos| (pos, 2));
    let separator = match (crlf, lf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    };

    match separator {
        Some((pos, len)) => (&raw[..pos], &raw[pos + len..]),
        None if raw.starts_with(b"\r\n") => (&[], &raw[2..]),
        None if raw.starts_with(b"\n") => (&[], &raw[1..]),
        None => (raw, &[]),
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Parse comma-separated list (Newsgroups, Followup-To)
pub fn parse_comma_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a header block into an ordered header list
///
/// Continuation lines (leading space or tab) are unfolded into the
/// previous header with a single space. Lines without a colon are skipped.
pub fn parse_headers(text: &str) -> Headers {
    let mut headers = Headers::new();
    let mut current: Option<(String, String)> = None;

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }

        if line.starts_with([' ', '\t']) {
            if let Some((_, value)) = current.as_mut() {
                if !value.is_empty() {
                    value.push(' ');
                }
                value.push_str(line.trim());
            }
            continue;
        }

        if let Some((name, value)) = current.take() {
            headers.append(name, value);
        }
        match line.split_once(':') {
            Some((name, value)) => {
                current = Some((name.trim().to_string(), value.trim().to_string()));
            }
            None => trace!("Skipping malformed header line {:?}", line),
        }
    }

    if let Some((name, value)) = current {
        headers.append(name, value);
    }
    headers
}

/// Parse a complete article
///
/// # Example
///
/// ```
/// use ftngate::article::parse_article;
///
/// let raw = b"From: Joe <joe@example.com>\r\n\
///     Subject: =?UTF-8?Q?Gr=C3=BC=C3=9Fe?=\r\n\
///     Content-Type: text/plain; charset=ISO-8859-1\r\n\
///     Content-Transfer-Encoding: quoted-printable\r\n\
///     \r\n\
///     Sch=F6ne Gr=FC=DFe\r\n";
///
/// let article = parse_article(raw, "test.group", Some(7));
/// assert_eq!(article.subject(), "Grüße");
/// assert_eq!(article.body, "Schöne Grüße\n");
/// assert_eq!(article.number, Some(7));
/// ```
pub fn parse_article(raw: &[u8], newsgroup: &str, number: Option<u64>) -> NntpArticle {
    let (head, body) = split_article(raw);
    let headers = parse_headers(&header_text(head));
    let body = decode_entity(&headers, body);

    NntpArticle {
        newsgroup: newsgroup.to_string(),
        number,
        headers,
        body,
    }
}

/// Header bytes as text: UTF-8 when valid, otherwise Latin-1
pub(crate) fn header_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => Charset::Latin1.decode(bytes).0,
    }
}

/// Decode a MIME entity body to text
fn decode_entity(headers: &Headers, body: &[u8]) -> String {
    let content_type = headers.get("Content-Type").unwrap_or("text/plain");
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if media_type.starts_with("multipart/") {
        if let Some(boundary) = content_type_param(content_type, "boundary") {
            let texts: Vec<String> = multipart_parts(body, boundary)
                .into_iter()
                .filter_map(|part| {
                    let (head, part_body) = split_article(part);
                    let part_headers = parse_headers(&header_text(head));
                    let part_type = part_headers
                        .get("Content-Type")
                        .unwrap_or("text/plain")
                        .to_ascii_lowercase();
                    (part_type.starts_with("text/plain") || part_type.starts_with("multipart/"))
                        .then(|| decode_entity(&part_headers, part_body))
                })
                .filter(|text| !text.is_empty())
                .collect();

            if !texts.is_empty() {
                debug!("Extracted {} text part(s) from multipart body", texts.len());
                let joined = texts.join("\n");
                let trimmed = joined.trim_end_matches('\n');
                return format!("{trimmed}\n");
            }
            debug!("No text/plain part in multipart body");
        }
    }

    let encoding = headers
        .get("Content-Transfer-Encoding")
        .unwrap_or("7bit")
        .trim()
        .to_ascii_lowercase();
    let bytes = match encoding.as_str() {
        "quoted-printable" => decode_quoted_printable(body),
        "base64" => {
            let compact: Vec<u8> = body
                .iter()
                .copied()
                .filter(|b| !b.is_ascii_whitespace())
                .collect();
            BASE64.decode(&compact).unwrap_or_else(|e| {
                debug!("Invalid base64 body ({}), keeping raw text", e);
                body.to_vec()
            })
        }
        _ => body.to_vec(),
    };

    let declared = content_type_param(content_type, "charset");
    let text = match declared.and_then(Charset::from_mime_label) {
        Some(charset) => charset.decode(&bytes).0,
        None => {
            if let Some(label) = declared {
                debug!("Unsupported charset {:?}, decoding as UTF-8", label);
            }
            match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(e) => Charset::Latin1.decode(e.as_bytes()).0,
            }
        }
    };

    text.replace("\r\n", "\n")
}

/// Bodies of the parts between `--boundary` delimiters
fn multipart_parts<'a>(body: &'a [u8], boundary: &str) -> Vec<&'a [u8]> {
    let delimiter = format!("--{boundary}");
    let mut parts = Vec::new();
    let mut start: Option<usize> = None;
    let mut offset = 0;

    for line in body.split_inclusive(|&b| b == b'\n') {
        let trimmed = trim_line_end(line);
        if trimmed.starts_with(delimiter.as_bytes()) {
            if let Some(begin) = start {
                // The line break before a delimiter belongs to the delimiter
                let end = strip_trailing_newline(&body[begin..offset]);
                parts.push(end);
            }
            if trimmed == format!("{delimiter}--").as_bytes() {
                return parts;
            }
            start = Some(offset + line.len());
        }
        offset += line.len();
    }

    if let Some(begin) = start {
        parts.push(&body[begin..]);
    }
    parts
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    // Transport padding after the delimiter
    let end = line
        .iter()
        .rposition(|b| !matches!(b, b' ' | b'\t'))
        .map_or(0, |i| i + 1);
    &line[..end]
}

fn strip_trailing_newline(part: &[u8]) -> &[u8] {
    let part = part.strip_suffix(b"\n").unwrap_or(part);
    part.strip_suffix(b"\r").unwrap_or(part)
}

/// Quoted-printable body decoding (RFC 2045)
///
/// Soft line breaks (`=` at end of line) are removed; malformed escapes
/// are kept as is.
pub fn decode_quoted_printable(body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len());
    let mut i = 0;

    while i < body.len() {
        if body[i] != b'=' {
            out.push(body[i]);
            i += 1;
            continue;
        }

        match body.get(i + 1..) {
            Some([b'\r', b'\n', ..]) => i += 3,
            Some([b'\n', ..]) => i += 2,
            Some([h, l, ..]) if h.is_ascii_hexdigit() && l.is_ascii_hexdigit() => {
                let hex = [*h, *l];
                let value = std::str::from_utf8(&hex)
                    .ok()
                    .and_then(|s| u8::from_str_radix(s, 16).ok());
                match value {
                    Some(byte) => out.push(byte),
                    None => out.extend_from_slice(&[b'=', *h, *l]),
                }
                i += 3;
            }
            _ => {
                out.push(b'=');
                i += 1;
            }
        }
    }
    out
}
