//! Error types for the packet codec, address parsing, NNTP client and gateway

use thiserror::Error;

/// NNTP protocol and connection errors
#[derive(Error, Debug)]
pub enum NntpError {
    /// IO error during network operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS error during secure connection
    #[error("TLS error: {0}")]
    Tls(String),

    /// Connection or read timeout
    #[error("Connection timeout")]
    Timeout,

    /// Response line or payload that could not be parsed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// 4xx reply; the caller may retry at its next run
    #[error("NNTP temporary error {code}: {message}")]
    Temporary {
        /// NNTP response code (400-499)
        code: u16,
        /// Error message from server
        message: String,
    },

    /// 5xx reply; retrying will not help
    #[error("NNTP permanent error {code}: {message}")]
    Permanent {
        /// NNTP response code (500 and above)
        code: u16,
        /// Error message from server
        message: String,
    },

    /// Reply code outside the expected set that is neither 4xx nor 5xx
    #[error("Unexpected NNTP reply {code}: {message}")]
    Protocol {
        /// NNTP response code
        code: u16,
        /// Message from server
        message: String,
    },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Command issued after QUIT
    #[error("Connection closed")]
    ConnectionClosed,
}

impl NntpError {
    /// Classify an unexpected reply by its code class
    pub fn from_reply(code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            500.. => NntpError::Permanent { code, message },
            400..=499 => NntpError::Temporary { code, message },
            _ => NntpError::Protocol { code, message },
        }
    }

    /// Whether the failure may go away if the same work is attempted again later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            NntpError::Temporary { .. }
                | NntpError::Timeout
                | NntpError::Io(_)
                | NntpError::ConnectionClosed
        )
    }

    /// Reply code carried by the error, if any
    pub fn code(&self) -> Option<u16> {
        match self {
            NntpError::Temporary { code, .. }
            | NntpError::Permanent { code, .. }
            | NntpError::Protocol { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Result type alias using NntpError
pub type Result<T> = std::result::Result<T, NntpError>;

/// Structural failure while reading a packet file
///
/// Either variant aborts the packet being read; other packets are unaffected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PacketError {
    /// Input ended before a complete structure could be read
    #[error("packet truncated at offset {offset}: needed {needed} more byte(s)")]
    Truncated {
        /// Offset where the incomplete structure starts
        offset: usize,
        /// Bytes missing to complete it
        needed: usize,
    },

    /// A message version marker other than 0 (end) or 2 (message)
    #[error("corrupt packet at offset {offset}: unexpected message marker {marker:#06x}")]
    Corrupt {
        /// Offset of the marker
        offset: usize,
        /// Marker value found
        marker: u16,
    },
}

/// FidoNet address parse failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The text is not `zone:net/node[.point][@domain]`
    #[error("malformed FidoNet address: {0:?}")]
    Malformed(String),
}

/// Failure translating or packing messages between the two networks
#[derive(Error, Debug)]
pub enum GatewayError {
    /// A configured or embedded address could not be parsed
    #[error(transparent)]
    Address(#[from] AddressError),

    /// Packet structure error
    #[error(transparent)]
    Packet(#[from] PacketError),

    /// NNTP transport error
    #[error(transparent)]
    Nntp(#[from] NntpError),

    /// The source article lacks a header the translation needs
    #[error("missing header: {0}")]
    MissingHeader(&'static str),

    /// Every candidate outbound packet name was already taken
    #[error("no free packet name after {0} attempts")]
    NoFreePacketName(u32),

    /// Writing a packet file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
