//! Packet serialization

use tracing::{debug, warn};

use super::types::{EncodedPacket, FidoMessage, Field, PacketHeader, Truncation};
use super::{DATE_FIELD_SIZE, END_OF_PACKET, MAX_NAME_LEN, MAX_SUBJECT_LEN, MESSAGE_VERSION};
use crate::bridge::Charset;

impl PacketHeader {
    /// Encode the header as its 58 wire bytes
    pub fn to_bytes(&self) -> [u8; super::HEADER_SIZE] {
        let mut out = [0u8; super::HEADER_SIZE];
        let words = [
            (0, self.orig_node),
            (2, self.dest_node),
            (4, self.year),
            (6, self.month),
            (8, self.day),
            (10, self.hour),
            (12, self.minute),
            (14, self.second),
            (16, self.baud),
            (18, self.packet_type),
            (20, self.orig_net),
            (22, self.dest_net),
            (34, self.qm_orig_zone),
            (36, self.qm_dest_zone),
            (38, self.aux_net),
            (40, self.capability_validate),
            (44, self.capability_word),
            (46, self.orig_zone),
            (48, self.dest_zone),
            (50, self.orig_point),
            (52, self.dest_point),
        ];
        for (offset, value) in words {
            out[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
        }
        out[24] = self.product_code_lo;
        out[25] = self.product_revision;
        out[26..34].copy_from_slice(&self.password);
        out[42] = self.product_code_hi;
        out[43] = self.revision_minor;
        out[54..58].copy_from_slice(&self.extra_info.to_le_bytes());
        out
    }
}

/// Serialize messages into a complete packet
///
/// Text is encoded with each message's [`charset`](FidoMessage::charset);
/// characters it cannot represent become `?`. Each line keeps the terminator
/// it was read with (CR for composed text) and NUL characters are dropped.
/// `to`/`from` are cut to 35 bytes and the subject to 71, each cut reported
/// in [`EncodedPacket::truncations`].
pub fn write(messages: &[FidoMessage], header: &PacketHeader) -> EncodedPacket {
    let mut bytes = Vec::with_capacity(super::HEADER_SIZE + messages.len() * 512);
    bytes.extend_from_slice(&header.to_bytes());
    let mut truncations = Vec::new();

    for (index, message) in messages.iter().enumerate() {
        write_message(&mut bytes, index, message, &mut truncations);
    }

    bytes.extend_from_slice(&END_OF_PACKET.to_le_bytes());
    debug!(
        "Wrote packet {} -> {}: {} message(s), {} bytes",
        header.origin(),
        header.destination(),
        messages.len(),
        bytes.len()
    );

    EncodedPacket { bytes, truncations }
}

fn write_message(
    out: &mut Vec<u8>,
    index: usize,
    message: &FidoMessage,
    truncations: &mut Vec<Truncation>,
) {
    out.extend_from_slice(&MESSAGE_VERSION.to_le_bytes());
    for value in [
        message.orig_node,
        message.dest_node,
        message.orig_net,
        message.dest_net,
        message.attributes,
        message.cost,
    ] {
        out.extend_from_slice(&value.to_le_bytes());
    }

    let mut date = [0u8; DATE_FIELD_SIZE];
    for (slot, ch) in date.iter_mut().zip(message.date.chars()) {
        *slot = u8::try_from(u32::from(ch)).unwrap_or(b'?');
    }
    out.extend_from_slice(&date);

    let charset = message.charset;
    let fields = [
        (Field::To, &message.to, MAX_NAME_LEN),
        (Field::From, &message.from, MAX_NAME_LEN),
        (Field::Subject, &message.subject, MAX_SUBJECT_LEN),
    ];
    for (field, value, limit) in fields {
        let (encoded, original_len) = encode_field(charset, value, limit);
        if encoded.len() < original_len {
            warn!(
                "Message {} {:?} cut from {} to {} bytes",
                index,
                field,
                original_len,
                encoded.len()
            );
            truncations.push(Truncation {
                message: index,
                field,
                original_len,
                kept_len: encoded.len(),
            });
        }
        out.extend_from_slice(&encoded);
        out.push(0);
    }

    let mut text = String::new();
    for (i, line) in message.lines.iter().enumerate() {
        text.extend(line.chars().filter(|&c| c != '\0'));
        if let Some(line_break) = message.line_break(i) {
            text.push_str(line_break.as_str());
        }
    }
    out.extend_from_slice(&charset.encode_lossy(&text));
    out.push(0);
}

/// Encode a name field, cutting it to `limit` bytes on a character boundary
fn encode_field(charset: Charset, value: &str, limit: usize) -> (Vec<u8>, usize) {
    let value: String = value.chars().filter(|&c| c != '\0').collect();
    let full = charset.encode_lossy(&value);
    if full.len() <= limit {
        let len = full.len();
        return (full, len);
    }

    let mut kept = Vec::with_capacity(limit);
    let mut buf = [0u8; 4];
    for ch in value.chars() {
        let encoded = charset.encode_lossy(ch.encode_utf8(&mut buf));
        if kept.len() + encoded.len() > limit {
            break;
        }
        kept.extend_from_slice(&encoded);
    }
    (kept, full.len())
}
