//! Packet parsing
//!
//! Structural errors stop the parse at the offending offset; there is no
//! attempt to resynchronize on the next message.

use tracing::{debug, trace, warn};

use super::text::{declared_charset, split_lines};
use super::types::{FidoMessage, PacketHeader};
use super::{DATE_FIELD_SIZE, END_OF_PACKET, HEADER_SIZE, MESSAGE_RECORD_SIZE, MESSAGE_VERSION};
use crate::bridge::Charset;
use crate::error::PacketError;

/// Read a u16 from little-endian bytes at given offset
pub(super) fn read_u16_le(data: &[u8], offset: usize) -> Result<u16, PacketError> {
    let bytes: [u8; 2] = data
        .get(offset..offset + 2)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| PacketError::Truncated {
            offset,
            needed: (offset + 2).saturating_sub(data.len()),
        })?;
    Ok(u16::from_le_bytes(bytes))
}

/// Read a u32 from little-endian bytes at given offset
fn read_u32_le(data: &[u8], offset: usize) -> Result<u32, PacketError> {
    let bytes: [u8; 4] = data
        .get(offset..offset + 4)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| PacketError::Truncated {
            offset,
            needed: (offset + 4).saturating_sub(data.len()),
        })?;
    Ok(u32::from_le_bytes(bytes))
}

/// Sequential reader over packet bytes
pub(super) struct PacketReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PacketReader<'a> {
    pub(super) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(super) fn position(&self) -> usize {
        self.pos
    }

    pub(super) fn take(&mut self, len: usize) -> Result<&'a [u8], PacketError> {
        let slice = self
            .data
            .get(self.pos..self.pos + len)
            .ok_or_else(|| PacketError::Truncated {
                offset: self.pos,
                needed: (self.pos + len).saturating_sub(self.data.len()),
            })?;
        self.pos += len;
        Ok(slice)
    }

    pub(super) fn read_u16(&mut self) -> Result<u16, PacketError> {
        let value = read_u16_le(self.data, self.pos)?;
        self.pos += 2;
        Ok(value)
    }

    /// NUL-terminated string, terminator consumed but not returned
    pub(super) fn read_cstring(&mut self) -> Result<&'a [u8], PacketError> {
        let rest = &self.data[self.pos..];
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(PacketError::Truncated {
                offset: self.pos,
                needed: 1,
            })?;
        let value = &rest[..len];
        self.pos += len + 1;
        Ok(value)
    }

    /// Message text up to its terminating NUL
    ///
    /// A NUL terminates the text only when followed by another NUL or by
    /// the little-endian value 2; a NUL as the very last byte also ends it.
    /// Any other NUL is embedded: kept when `keep_embedded` is set, dropped
    /// otherwise. Offsets of embedded NULs are returned alongside the text.
    pub(super) fn read_text(
        &mut self,
        keep_embedded: bool,
    ) -> Result<(Vec<u8>, Vec<usize>), PacketError> {
        let start = self.pos;
        let mut text = Vec::new();
        let mut embedded = Vec::new();

        loop {
            let rest = &self.data[self.pos..];
            let Some(len) = rest.iter().position(|&b| b == 0) else {
                return Err(PacketError::Truncated {
                    offset: start,
                    needed: 1,
                });
            };
            let nul = self.pos + len;
            text.extend_from_slice(&rest[..len]);
            self.pos = nul + 1;

            let next = self.data.get(nul + 1..);
            let is_terminator = match next {
                None | Some([]) => true,
                Some([0, ..]) | Some([2, 0, ..]) => true,
                Some(_) => false,
            };
            if is_terminator {
                return Ok((text, embedded));
            }

            trace!("Embedded NUL at offset {}", nul);
            embedded.push(nul);
            if keep_embedded {
                text.push(0);
            }
        }
    }
}

impl PacketHeader {
    /// Decode the 58-byte header at the start of `data`
    ///
    /// # Errors
    ///
    /// [`PacketError::Truncated`] if fewer than 58 bytes are available.
    pub fn from_bytes(data: &[u8]) -> Result<Self, PacketError> {
        if data.len() < HEADER_SIZE {
            return Err(PacketError::Truncated {
                offset: 0,
                needed: HEADER_SIZE - data.len(),
            });
        }

        let u16_at = |offset| read_u16_le(data, offset);
        let mut password = [0u8; 8];
        password.copy_from_slice(&data[26..34]);

        Ok(Self {
            orig_node: u16_at(0)?,
            dest_node: u16_at(2)?,
            year: u16_at(4)?,
            month: u16_at(6)?,
            day: u16_at(8)?,
            hour: u16_at(10)?,
            minute: u16_at(12)?,
            second: u16_at(14)?,
            baud: u16_at(16)?,
            packet_type: u16_at(18)?,
            orig_net: u16_at(20)?,
            dest_net: u16_at(22)?,
            product_code_lo: data[24],
            product_revision: data[25],
            password,
            qm_orig_zone: u16_at(34)?,
            qm_dest_zone: u16_at(36)?,
            aux_net: u16_at(38)?,
            capability_validate: u16_at(40)?,
            product_code_hi: data[42],
            revision_minor: data[43],
            capability_word: u16_at(44)?,
            orig_zone: u16_at(46)?,
            dest_zone: u16_at(48)?,
            orig_point: u16_at(50)?,
            dest_point: u16_at(52)?,
            extra_info: read_u32_le(data, 54)?,
        })
    }
}

/// Parse a packet file into its header and messages
///
/// Text is decoded with the charset named by each message's CHRS kludge
/// (CP437 when absent); undecodable bytes become replacement characters.
/// Embedded NULs are kept as `'\0'` characters.
///
/// # Example
///
/// ```
/// use ftngate::packet::{self, MessageBuilder, PacketHeader};
/// use ftngate::Address;
///
/// let orig = Address::new(1, 1, 1, 0);
/// let dest = Address::new(1, 1, 2, 0);
/// let message = MessageBuilder::new(orig, dest)
///     .area("TEST.AREA")
///     .from("Sysop")
///     .to("All")
///     .subject("Hello")
///     .body("First line\nSecond line")
///     .seen_by(["1/1", "1/2"])
///     .build();
///
/// let header = PacketHeader::new(orig, dest, "", chrono::NaiveDateTime::default());
/// let encoded = packet::write(&[message], &header);
///
/// let (parsed_header, messages) = packet::parse(&encoded.bytes).unwrap();
/// assert_eq!(parsed_header, header);
/// assert_eq!(messages[0].area, "TEST.AREA");
/// assert_eq!(messages[0].body_text(), "First line\nSecond line");
/// ```
///
/// # Errors
///
/// - [`PacketError::Truncated`] - input ends inside the header, a message
///   record, a string, or the text
/// - [`PacketError::Corrupt`] - a version marker other than 0 or 2
pub fn parse(data: &[u8]) -> Result<(PacketHeader, Vec<FidoMessage>), PacketError> {
    let header = PacketHeader::from_bytes(data)?;
    debug!(
        "Packet {} -> {}, {} bytes",
        header.origin(),
        header.destination(),
        data.len()
    );

    let mut reader = PacketReader::new(data);
    reader.take(HEADER_SIZE)?;

    let mut messages = Vec::new();
    loop {
        let offset = reader.position();
        match reader.read_u16()? {
            END_OF_PACKET => break,
            MESSAGE_VERSION => messages.push(read_message(&mut reader)?),
            marker => {
                warn!("Unexpected message marker {:#06x} at offset {}", marker, offset);
                return Err(PacketError::Corrupt { offset, marker });
            }
        }
    }

    debug!("Parsed {} message(s)", messages.len());
    Ok((header, messages))
}

fn read_message(reader: &mut PacketReader<'_>) -> Result<FidoMessage, PacketError> {
    let record = reader.take(MESSAGE_RECORD_SIZE)?;
    let field = |i: usize| u16::from_le_bytes([record[i * 2], record[i * 2 + 1]]);

    let date_field = reader.take(DATE_FIELD_SIZE)?;
    let date_len = date_field
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(DATE_FIELD_SIZE);
    let date = date_field[..date_len].iter().map(|&b| b as char).collect();

    let to = reader.read_cstring()?;
    let from = reader.read_cstring()?;
    let subject = reader.read_cstring()?;
    let text_offset = reader.position();
    let (text, embedded) = reader.read_text(true)?;
    if !embedded.is_empty() {
        warn!(
            "Message text at offset {} contains {} embedded NUL(s)",
            text_offset,
            embedded.len()
        );
    }

    let (raw_lines, line_breaks) = split_lines(&text);
    let ends_with_newline = !raw_lines.is_empty() && line_breaks.len() == raw_lines.len();
    let charset = declared_charset(&raw_lines);
    let lines = raw_lines
        .iter()
        .map(|line| decode(charset, line, text_offset))
        .collect();

    let mut message = FidoMessage {
        orig_node: field(0),
        dest_node: field(1),
        orig_net: field(2),
        dest_net: field(3),
        attributes: field(4),
        cost: field(5),
        date,
        to: decode(charset, to, text_offset),
        from: decode(charset, from, text_offset),
        subject: decode(charset, subject, text_offset),
        charset,
        ..Default::default()
    };
    message.set_text(lines, ends_with_newline);
    message.line_breaks = line_breaks;

    trace!(
        "Message from {:?} to {:?} area {:?}",
        message.from, message.to, message.area
    );
    Ok(message)
}

fn decode(charset: Charset, bytes: &[u8], offset: usize) -> String {
    let (text, lossy) = charset.decode(bytes);
    if lossy {
        debug!(
            "Text near offset {} is not valid {}, decoded lossily",
            offset,
            charset.chrs_identifier()
        );
    }
    text
}
