//! Message builder for composing outbound messages

use chrono::{Local, NaiveDateTime};

use super::types::FidoMessage;
use crate::address::{Address, format_net_list};
use crate::bridge::{Charset, format_fido_date};

/// Longest SEEN-BY / PATH line
const MAX_LIST_LINE: usize = 79;

/// Builder for [`FidoMessage`]
///
/// Produces the text lines in the conventional order and then derives the
/// message views from them, so a built message looks exactly like a parsed
/// one.
///
/// ```
/// use ftngate::packet::MessageBuilder;
/// use ftngate::Address;
///
/// let message = MessageBuilder::new(Address::new(2, 5020, 1042, 0), Address::new(2, 5020, 52, 0))
///     .area("RU.TEST")
///     .from("Gate")
///     .to("All")
///     .subject("Test")
///     .msgid("2:5020/1042 12345678")
///     .body("Hello\r\nWorld\r\n")
///     .tear_line("ftngate")
///     .origin("Test gate (2:5020/1042)")
///     .seen_by(["5020/1042", "5020/52"])
///     .path(["5020/1042"])
///     .build();
///
/// assert_eq!(message.lines[0], "AREA:RU.TEST");
/// assert_eq!(message.body, vec!["Hello", "World", ""]);
/// assert!(message.lines.contains(&"SEEN-BY: 5020/1042 52".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    orig: Address,
    dest: Address,
    to: String,
    from: String,
    subject: String,
    date: Option<NaiveDateTime>,
    attributes: u16,
    area: Option<String>,
    charset: Option<Charset>,
    msgid: Option<String>,
    reply: Option<String>,
    pid: Option<String>,
    tid: Option<String>,
    tzutc: Option<String>,
    extra: Vec<(String, String)>,
    body: String,
    tear_line: Option<String>,
    origin: Option<String>,
    seen_by: Vec<String>,
    path: Vec<String>,
}

impl MessageBuilder {
    /// Create a builder for a message from `orig` to `dest`
    pub fn new(orig: Address, dest: Address) -> Self {
        Self {
            orig,
            dest,
            to: String::new(),
            from: String::new(),
            subject: String::new(),
            date: None,
            attributes: 0,
            area: None,
            charset: None,
            msgid: None,
            reply: None,
            pid: None,
            tid: None,
            tzutc: None,
            extra: Vec::new(),
            body: String::new(),
            tear_line: None,
            origin: None,
            seen_by: Vec::new(),
            path: Vec::new(),
        }
    }

    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = to.into();
        self
    }

    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Message date (default: now, local time)
    pub fn date(mut self, date: NaiveDateTime) -> Self {
        self.date = Some(date);
        self
    }

    /// Attribute bits for the message record
    pub fn attributes(mut self, attributes: u16) -> Self {
        self.attributes = attributes;
        self
    }

    /// Echomail area tag; without one the message is netmail
    pub fn area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    /// Charset for the text; also emits a CHRS kludge
    pub fn charset(mut self, charset: Charset) -> Self {
        self.charset = Some(charset);
        self
    }

    pub fn msgid(mut self, msgid: impl Into<String>) -> Self {
        self.msgid = Some(msgid.into());
        self
    }

    pub fn reply(mut self, reply: impl Into<String>) -> Self {
        self.reply = Some(reply.into());
        self
    }

    pub fn pid(mut self, pid: impl Into<String>) -> Self {
        self.pid = Some(pid.into());
        self
    }

    pub fn tid(mut self, tid: impl Into<String>) -> Self {
        self.tid = Some(tid.into());
        self
    }

    /// TZUTC offset, e.g. `"-0500"`
    pub fn tzutc(mut self, tzutc: impl Into<String>) -> Self {
        self.tzutc = Some(tzutc.into());
        self
    }

    /// Add another kludge, emitted after the well-known ones
    pub fn kludge(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    /// Message body; any line ending style is accepted
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Tear line text (echomail only)
    pub fn tear_line(mut self, tear_line: impl Into<String>) -> Self {
        self.tear_line = Some(tear_line.into());
        self
    }

    /// Origin line text (echomail only)
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// SEEN-BY entries as `net/node` (echomail only)
    pub fn seen_by<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seen_by = entries.into_iter().map(Into::into).collect();
        self
    }

    /// PATH entries as `net/node` (echomail only)
    pub fn path<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path = entries.into_iter().map(Into::into).collect();
        self
    }

    /// Compose the message
    pub fn build(self) -> FidoMessage {
        let date = self.date.unwrap_or_else(|| Local::now().naive_local());
        let echomail = self.area.as_deref().is_some_and(|a| !a.is_empty());
        let mut lines = Vec::new();

        if let Some(area) = self.area.as_deref().filter(|_| echomail) {
            lines.push(format!("AREA:{area}"));
        } else {
            lines.push(format!(
                "\u{1}INTL {} {}",
                self.dest.node_address(),
                self.orig.node_address()
            ));
            if self.orig.point != 0 {
                lines.push(format!("\u{1}FMPT {}", self.orig.point));
            }
            if self.dest.point != 0 {
                lines.push(format!("\u{1}TOPT {}", self.dest.point));
            }
        }

        let chrs = self.charset.map(Charset::chrs_value);
        let known = [
            ("MSGID", self.msgid),
            ("REPLY", self.reply),
            ("PID", self.pid),
            ("TID", self.tid),
            ("CHRS", chrs),
            ("TZUTC", self.tzutc),
        ];
        for (key, value) in known {
            if let Some(value) = value {
                lines.push(format!("\u{1}{key}: {value}"));
            }
        }
        for (key, value) in &self.extra {
            lines.push(format!("\u{1}{key}: {value}"));
        }

        lines.extend(body_lines(&self.body));

        if echomail {
            lines.push(String::new());
            lines.push(match &self.tear_line {
                Some(tear) => format!("--- {tear}"),
                None => "---".to_string(),
            });
            if let Some(origin) = &self.origin {
                lines.push(format!(" * Origin: {origin}"));
            }
            lines.extend(wrap_net_list("SEEN-BY: ", &self.seen_by));
            lines.extend(wrap_net_list("\u{1}PATH: ", &self.path));
        }

        let mut message = FidoMessage {
            orig_node: self.orig.node,
            dest_node: self.dest.node,
            orig_net: self.orig.net,
            dest_net: self.dest.net,
            attributes: self.attributes,
            cost: 0,
            date: format_fido_date(&date),
            to: self.to,
            from: self.from,
            subject: self.subject,
            charset: self.charset.unwrap_or_default(),
            ..Default::default()
        };
        message.set_text(lines, true);
        message
    }
}

/// Normalize a body to NUL-free lines without trailing blank lines
fn body_lines(body: &str) -> Vec<String> {
    let normalized = body.replace("\r\n", "\n").replace('\r', "\n").replace('\0', "");
    let trimmed = normalized.trim_end_matches('\n');
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('\n').map(str::to_string).collect()
}

/// Compressed net list lines no longer than 79 characters
fn wrap_net_list(prefix: &str, entries: &[String]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut chunk: Vec<&str> = Vec::new();

    for entry in entries {
        chunk.push(entry);
        if chunk.len() > 1 && prefix.len() + format_net_list(&chunk).len() > MAX_LIST_LINE {
            chunk.pop();
            lines.push(format!("{prefix}{}", format_net_list(&chunk)));
            chunk.clear();
            chunk.push(entry);
        }
    }
    if !chunk.is_empty() {
        lines.push(format!("{prefix}{}", format_net_list(&chunk)));
    }
    lines
}
