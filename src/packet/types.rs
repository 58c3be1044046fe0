//! Packet header, message record and write diagnostics

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::address::Address;
use crate::bridge::Charset;

/// The 58-byte type 2+ packet header
///
/// Every field is kept as read so a parsed header writes back unchanged.
/// `month` is 0-based, as on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PacketHeader {
    pub orig_node: u16,
    pub dest_node: u16,
    pub year: u16,
    /// 0 = January
    pub month: u16,
    pub day: u16,
    pub hour: u16,
    pub minute: u16,
    pub second: u16,
    pub baud: u16,
    /// Always 2
    pub packet_type: u16,
    pub orig_net: u16,
    pub dest_net: u16,
    pub product_code_lo: u8,
    pub product_revision: u8,
    /// NUL padded
    pub password: [u8; 8],
    pub qm_orig_zone: u16,
    pub qm_dest_zone: u16,
    pub aux_net: u16,
    /// Byte-swapped copy of `capability_word`
    pub capability_validate: u16,
    pub product_code_hi: u8,
    pub revision_minor: u8,
    pub capability_word: u16,
    pub orig_zone: u16,
    pub dest_zone: u16,
    pub orig_point: u16,
    pub dest_point: u16,
    pub extra_info: u32,
}

impl PacketHeader {
    /// Header for a new outbound packet
    ///
    /// The password is cut to 8 bytes.
    pub fn new(orig: Address, dest: Address, password: &str, created: NaiveDateTime) -> Self {
        let mut pw = [0u8; 8];
        for (slot, byte) in pw.iter_mut().zip(password.bytes()) {
            *slot = byte;
        }

        Self {
            orig_node: orig.node,
            dest_node: dest.node,
            year: created.year() as u16,
            month: created.month0() as u16,
            day: created.day() as u16,
            hour: created.hour() as u16,
            minute: created.minute() as u16,
            second: created.second() as u16,
            baud: 0,
            packet_type: 2,
            orig_net: orig.net,
            dest_net: dest.net,
            product_code_lo: 0,
            product_revision: 0,
            password: pw,
            qm_orig_zone: orig.zone,
            qm_dest_zone: dest.zone,
            aux_net: 0,
            capability_validate: 0x0100,
            product_code_hi: 1,
            revision_minor: 0,
            capability_word: 0x0001,
            orig_zone: orig.zone,
            dest_zone: dest.zone,
            orig_point: orig.point,
            dest_point: dest.point,
            extra_info: 0,
        }
    }

    /// Originating system
    pub fn origin(&self) -> Address {
        Address::new(self.orig_zone, self.orig_net, self.orig_node, self.orig_point)
    }

    /// Destination system
    pub fn destination(&self) -> Address {
        Address::new(self.dest_zone, self.dest_net, self.dest_node, self.dest_point)
    }

    /// Password with NUL padding removed
    pub fn password(&self) -> String {
        let len = self.password.iter().position(|&b| b == 0).unwrap_or(8);
        String::from_utf8_lossy(&self.password[..len]).into_owned()
    }

    /// Creation time, if the header fields form a valid date
    pub fn created(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(
            i32::from(self.year),
            u32::from(self.month) + 1,
            u32::from(self.day),
        )?
        .and_hms_opt(
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second),
        )
    }
}

/// Well-known kludges of a message plus everything else in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Kludges {
    /// `MSGID`
    pub msgid: Option<String>,
    /// `REPLY`
    pub reply: Option<String>,
    /// `PID`
    pub pid: Option<String>,
    /// `TID`
    pub tid: Option<String>,
    /// `CHRS` (also `CHARSET`, or derived from a numeric `CODEPAGE`)
    pub chrs: Option<String>,
    /// `TZUTC` (also `TZUTCINFO`)
    pub tzutc: Option<String>,
    /// Remaining kludges (`INTL`, `FMPT`, `REPLYADDR`, ...) as (key, value)
    pub other: Vec<(String, String)>,
}

impl Kludges {
    /// Value of a kludge by (case-insensitive) key
    pub fn get(&self, key: &str) -> Option<&str> {
        let known = match key.to_ascii_uppercase().as_str() {
            "MSGID" => &self.msgid,
            "REPLY" => &self.reply,
            "PID" => &self.pid,
            "TID" => &self.tid,
            "CHRS" | "CHARSET" => &self.chrs,
            "TZUTC" | "TZUTCINFO" => &self.tzutc,
            _ => {
                return self
                    .other
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(key))
                    .map(|(_, v)| v.as_str());
            }
        };
        known.as_deref()
    }
}

/// One message of a packet
///
/// `lines` holds the text exactly as carried in the packet, in order, and is
/// what the writer emits. The remaining text fields are views derived from
/// it by [`FidoMessage::set_text`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FidoMessage {
    pub orig_node: u16,
    pub dest_node: u16,
    pub orig_net: u16,
    pub dest_net: u16,
    /// Attribute bits (private, crash, ...)
    pub attributes: u16,
    pub cost: u16,
    /// Date field text, trailing NULs removed
    pub date: String,
    pub to: String,
    pub from: String,
    pub subject: String,
    /// Charset the text was decoded from and will be encoded to
    pub charset: Charset,
    /// Raw text lines, kludges and trailer included
    pub lines: Vec<String>,
    /// Whether the text ended with a line break
    pub ends_with_newline: bool,
    /// Terminator after each line as read; lines past its end are
    /// written with CR
    pub line_breaks: Vec<LineBreak>,
    pub kludges: Kludges,
    /// Echomail area tag; empty for netmail
    pub area: String,
    /// AREA, SEEN-BY, tear and origin lines in order
    pub control_lines: Vec<String>,
    /// SEEN-BY entries expanded to `net/node`
    pub seen_by: Vec<String>,
    /// PATH entries expanded to `net/node`
    pub path: Vec<String>,
    /// Text after `* Origin:`
    pub origin: Option<String>,
    /// Text after `---`
    pub tear_line: Option<String>,
    /// Ordinary text lines
    pub body: Vec<String>,
}

impl FidoMessage {
    /// Replace the message text and re-derive kludges, trailer and body
    ///
    /// Recorded line breaks are discarded, so the text is written with CR.
    pub fn set_text(&mut self, lines: Vec<String>, ends_with_newline: bool) {
        self.lines = lines;
        self.ends_with_newline = ends_with_newline;
        self.line_breaks.clear();
        super::text::derive_views(self);
    }

    /// Terminator written after line `index`, if any
    pub fn line_break(&self, index: usize) -> Option<LineBreak> {
        let last = index + 1 == self.lines.len();
        if index >= self.lines.len() || (last && !self.ends_with_newline) {
            return None;
        }
        Some(self.line_breaks.get(index).copied().unwrap_or_default())
    }

    /// Whether this is an echomail message
    pub fn is_echomail(&self) -> bool {
        !self.area.is_empty()
    }

    /// Body lines joined with `\n`, trailing blank lines removed
    pub fn body_text(&self) -> String {
        let end = self
            .body
            .iter()
            .rposition(|line| !line.trim().is_empty())
            .map_or(0, |i| i + 1);
        self.body[..end].join("\n")
    }

    /// Originating address, zone supplied by the caller
    pub fn orig_address(&self, zone: u16) -> Address {
        Address::new(zone, self.orig_net, self.orig_node, 0)
    }

    /// Destination address, zone supplied by the caller
    pub fn dest_address(&self, zone: u16) -> Address {
        Address::new(zone, self.dest_net, self.dest_node, 0)
    }
}

/// Line terminator in message text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineBreak {
    /// Bare CR, the FTS-0001 form
    #[default]
    Cr,
    Lf,
    CrLf,
}

impl LineBreak {
    pub fn as_str(self) -> &'static str {
        match self {
            LineBreak::Cr => "\r",
            LineBreak::Lf => "\n",
            LineBreak::CrLf => "\r\n",
        }
    }
}

/// Which name field was cut on write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    To,
    From,
    Subject,
}

/// A field that did not fit its packet limit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncation {
    /// Index of the message within the written slice
    pub message: usize,
    pub field: Field,
    /// Encoded length before truncation
    pub original_len: usize,
    /// Encoded length written
    pub kept_len: usize,
}

/// Output of [`write`](super::write)
#[derive(Debug, Clone, Default)]
pub struct EncodedPacket {
    /// Complete packet file contents
    pub bytes: Vec<u8>,
    /// Fields that had to be shortened
    pub truncations: Vec<Truncation>,
}
