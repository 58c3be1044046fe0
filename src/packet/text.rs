//! Message text: line splitting and line classification

use crate::address::expand_net_list;
use crate::bridge::Charset;

use super::types::{FidoMessage, Kludges, LineBreak};

const KLUDGE_PREFIX: char = '\u{1}';
const AREA_PREFIX: &str = "AREA:";
const SEEN_BY_PREFIX: &str = "SEEN-BY:";
const TEAR_PREFIX: &str = "---";
const ORIGIN_PREFIXES: [&str; 2] = [" * Origin:", "# Origin:"];

/// Split raw text on CR, LF or CRLF
///
/// Returns the lines and the terminator found after each one. The text
/// ended with a line break when there are as many breaks as lines.
pub(super) fn split_lines(text: &[u8]) -> (Vec<&[u8]>, Vec<LineBreak>) {
    let mut lines = Vec::new();
    let mut breaks = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < text.len() {
        match text[i] {
            b'\r' => {
                lines.push(&text[start..i]);
                if text.get(i + 1) == Some(&b'\n') {
                    breaks.push(LineBreak::CrLf);
                    i += 1;
                } else {
                    breaks.push(LineBreak::Cr);
                }
                start = i + 1;
            }
            b'\n' => {
                lines.push(&text[start..i]);
                breaks.push(LineBreak::Lf);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    (lines, breaks)
}

/// Split a kludge line (without the `^A`) into key and value
///
/// Both `KEY: value` and `KEY value` are accepted; the key is uppercased.
///
/// ```
/// use ftngate::packet::parse_kludge;
///
/// assert_eq!(parse_kludge("MSGID: 2:5020/1042 4c7a9e01"),
///            Some(("MSGID".to_string(), "2:5020/1042 4c7a9e01".to_string())));
/// assert_eq!(parse_kludge("INTL 1:2/3 1:4/5"),
///            Some(("INTL".to_string(), "1:2/3 1:4/5".to_string())));
/// ```
pub fn parse_kludge(line: &str) -> Option<(String, String)> {
    let key_end = line
        .find(|c: char| c == ':' || c.is_whitespace())
        .unwrap_or(line.len());
    let key = &line[..key_end];
    if key.is_empty() {
        return None;
    }

    let rest = &line[key_end..];
    let value = rest.strip_prefix(':').unwrap_or(rest).trim();
    Some((key.to_ascii_uppercase(), value.to_string()))
}

/// Charset declared by the kludge lines of undecoded text
///
/// A numeric `CODEPAGE` wins over `CHRS`/`CHARSET`.
pub(super) fn declared_charset(lines: &[&[u8]]) -> Charset {
    let mut chrs = None;
    let mut codepage = None;

    for line in lines.iter().filter(|l| l.first() == Some(&1)) {
        let text: String = line[1..].iter().map(|&b| b as char).collect();
        match parse_kludge(&text) {
            Some((key, value)) if key == "CHRS" || key == "CHARSET" => chrs = Some(value),
            Some((key, value)) if key == "CODEPAGE" => codepage = codepage_chrs(&value),
            _ => {}
        }
    }

    Charset::from_kludge(codepage.or(chrs).as_deref())
}

fn codepage_chrs(value: &str) -> Option<String> {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    (!digits.is_empty()).then(|| format!("CP{digits} 2"))
}

/// Rebuild a message's kludges, trailer and body from its `lines`
pub(super) fn derive_views(message: &mut FidoMessage) {
    let mut kludges = Kludges::default();
    let mut codepage = None;
    let mut area = String::new();
    let mut control_lines = Vec::new();
    let mut seen_by = Vec::new();
    let mut path = Vec::new();
    let mut origin = None;
    let mut tear_line = None;
    let mut body = Vec::new();
    let mut seen_text = false;

    for line in &message.lines {
        if let Some(kludge) = line.strip_prefix(KLUDGE_PREFIX) {
            let Some((key, value)) = parse_kludge(kludge) else {
                continue;
            };
            match key.as_str() {
                "MSGID" => kludges.msgid = Some(value),
                "REPLY" => kludges.reply = Some(value),
                "PID" => kludges.pid = Some(value),
                "TID" => kludges.tid = Some(value),
                "CHRS" | "CHARSET" => kludges.chrs = Some(value),
                "TZUTC" | "TZUTCINFO" => kludges.tzutc = Some(value),
                "PATH" => path.extend(expand_net_list(&value)),
                _ => {
                    if key == "CODEPAGE" {
                        codepage = codepage_chrs(&value);
                    }
                    kludges.other.push((key, value));
                }
            }
            continue;
        }

        let first_text_line = !seen_text;
        seen_text = true;

        if first_text_line {
            if let Some(tag) = line.strip_prefix(AREA_PREFIX) {
                area = tag.trim().to_string();
                control_lines.push(line.clone());
                continue;
            }
        }

        if let Some(entries) = line.strip_prefix(SEEN_BY_PREFIX) {
            seen_by.extend(expand_net_list(entries));
            control_lines.push(line.clone());
        } else if let Some(rest) = line.strip_prefix(TEAR_PREFIX) {
            tear_line = Some(rest.trim().to_string());
            control_lines.push(line.clone());
        } else if let Some(rest) = ORIGIN_PREFIXES
            .iter()
            .find_map(|prefix| line.strip_prefix(prefix))
        {
            origin = Some(rest.trim().to_string());
            control_lines.push(line.clone());
        } else {
            body.push(line.clone());
        }
    }

    if codepage.is_some() {
        kludges.chrs = codepage;
    }

    message.kludges = kludges;
    message.area = area;
    message.control_lines = control_lines;
    message.seen_by = seen_by;
    message.path = path;
    message.origin = origin;
    message.tear_line = tear_line;
    message.body = body;
}
