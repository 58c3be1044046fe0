//! FTS-0001 type 2+ packet codec
//!
//! Reference: FTS-0001 (packet layout), FSC-0048 (type 2+ header),
//! FTS-4000 (kludges), FTS-4008 (TZUTC), FTS-5003 (CHRS).
//!
//! A packet is a 58-byte little-endian header followed by messages, each
//! introduced by the version marker `2`, and closed by a `0` marker:
//!
//! ```text
//! header (58) | 2 | record (12) | date (20) | to\0 | from\0 | subject\0 | text\0 | ... | 0
//! ```
//!
//! Message text may contain stray NUL bytes. A NUL only ends the text when
//! the next byte is another NUL or the next 16-bit value is `2`; any other
//! NUL is content. [`parse`] keeps such bytes, [`repair`] removes them.
//!
//! This module is organized into:
//! - `types`: header, message record and write diagnostics
//! - `text`: line splitting and kludge/control-line classification
//! - `parsing`: [`parse`]
//! - `writing`: [`write`]
//! - `repair`: [`repair`] and [`analyze`]
//! - `builder`: [`MessageBuilder`] for composing outbound messages

mod builder;
mod parsing;
mod repair;
mod text;
mod types;
mod writing;

pub use self::builder::MessageBuilder;
pub use self::parsing::parse;
pub use self::repair::{EmbeddedNull, PacketAnalysis, RepairOutcome, analyze, repair};
pub use self::text::parse_kludge;
pub use self::types::{
    EncodedPacket, FidoMessage, Field, Kludges, LineBreak, PacketHeader, Truncation,
};
pub use self::writing::write;

/// Size of the packet header
pub const HEADER_SIZE: usize = 58;
/// Size of the fixed per-message record that follows the version marker
pub const MESSAGE_RECORD_SIZE: usize = 12;
/// Size of the date field
pub const DATE_FIELD_SIZE: usize = 20;
/// Version marker introducing a message
pub const MESSAGE_VERSION: u16 = 2;
/// Version marker closing the packet
pub const END_OF_PACKET: u16 = 0;
/// Longest `to`/`from` name, in encoded bytes, before the NUL
pub const MAX_NAME_LEN: usize = 35;
/// Longest subject, in encoded bytes, before the NUL
pub const MAX_SUBJECT_LEN: usize = 71;
