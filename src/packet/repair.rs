//! Embedded-NUL detection and removal

use tracing::{debug, info};

use super::parsing::PacketReader;
use super::{DATE_FIELD_SIZE, END_OF_PACKET, HEADER_SIZE, MESSAGE_RECORD_SIZE, MESSAGE_VERSION};
use crate::error::PacketError;

/// A NUL byte inside message text that does not terminate it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedNull {
    /// Index of the message in the packet
    pub message: usize,
    /// Byte offset in the input
    pub offset: usize,
}

/// Result of [`repair`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOutcome {
    /// Packet with embedded NULs removed
    pub bytes: Vec<u8>,
    /// Number of messages in the packet
    pub messages: usize,
    /// NULs that were dropped
    pub removed: Vec<EmbeddedNull>,
}

/// Result of [`analyze`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PacketAnalysis {
    /// Messages walked before the end marker or the first error
    pub messages: usize,
    /// Embedded NULs found
    pub embedded_nulls: Vec<EmbeddedNull>,
    /// Structural error that stopped the walk
    pub error: Option<PacketError>,
}

/// Walk the packet structure, collecting embedded NUL offsets
///
/// Returns the partial result on a structural error.
fn walk(data: &[u8]) -> (usize, Vec<EmbeddedNull>, Option<PacketError>) {
    let mut reader = PacketReader::new(data);
    let mut found = Vec::new();
    let mut messages = 0;

    let result = (|| -> Result<(), PacketError> {
        reader.take(HEADER_SIZE)?;
        loop {
            let offset = reader.position();
            match reader.read_u16()? {
                END_OF_PACKET => return Ok(()),
                MESSAGE_VERSION => {
                    reader.take(MESSAGE_RECORD_SIZE + DATE_FIELD_SIZE)?;
                    for _ in 0..3 {
                        reader.read_cstring()?;
                    }
                    let (_, embedded) = reader.read_text(false)?;
                    found.extend(embedded.into_iter().map(|offset| EmbeddedNull {
                        message: messages,
                        offset,
                    }));
                    messages += 1;
                }
                marker => return Err(PacketError::Corrupt { offset, marker }),
            }
        }
    })();

    (messages, found, result.err())
}

/// Report embedded NULs without changing anything
///
/// Never fails; a structural problem is returned in
/// [`PacketAnalysis::error`] together with what was found before it.
pub fn analyze(data: &[u8]) -> PacketAnalysis {
    let (messages, embedded_nulls, error) = walk(data);
    debug!(
        "Analyzed packet: {} message(s), {} embedded NUL(s), error: {:?}",
        messages,
        embedded_nulls.len(),
        error
    );
    PacketAnalysis {
        messages,
        embedded_nulls,
        error,
    }
}

/// Remove embedded NULs from message text
///
/// Every other byte, header and record fields included, is copied as is.
///
/// # Errors
///
/// The same structural errors as [`parse`](super::parse).
pub fn repair(data: &[u8]) -> Result<RepairOutcome, PacketError> {
    let (messages, removed, error) = walk(data);
    if let Some(error) = error {
        return Err(error);
    }

    let mut bytes = Vec::with_capacity(data.len() - removed.len());
    let mut next = 0;
    for null in &removed {
        bytes.extend_from_slice(&data[next..null.offset]);
        next = null.offset + 1;
    }
    bytes.extend_from_slice(&data[next..]);

    if !removed.is_empty() {
        info!(
            "Removed {} embedded NUL(s) from {} message(s)",
            removed.len(),
            messages
        );
    }

    Ok(RepairOutcome {
        bytes,
        messages,
        removed,
    })
}
