//! NNTP replies and the status codes the client relies on

use crate::error::NntpError;

/// First digit of a reply code (RFC 3977 §3.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyClass {
    /// 1xx
    Informative,
    /// 2xx
    Completed,
    /// 3xx, the server waits for more input
    Continue,
    /// 4xx, may succeed if retried later
    Transient,
    /// 5xx
    Failed,
    /// Anything outside 100..=599
    Invalid,
}

impl ReplyClass {
    pub fn of(code: u16) -> Self {
        match code {
            100..=199 => ReplyClass::Informative,
            200..=299 => ReplyClass::Completed,
            300..=399 => ReplyClass::Continue,
            400..=499 => ReplyClass::Transient,
            500..=599 => ReplyClass::Failed,
            _ => ReplyClass::Invalid,
        }
    }
}

/// Text reply: status line plus unstuffed body lines
#[derive(Debug, Clone)]
pub struct NntpResponse {
    pub code: u16,
    /// Status line text after the code
    pub message: String,
    /// Body lines for multi-line replies, empty otherwise
    pub lines: Vec<String>,
}

impl NntpResponse {
    pub fn class(&self) -> ReplyClass {
        ReplyClass::of(self.code)
    }

    pub fn is_success(&self) -> bool {
        self.class() == ReplyClass::Completed
    }

    pub fn is_continuation(&self) -> bool {
        self.class() == ReplyClass::Continue
    }

    /// 4xx or 5xx
    pub fn is_error(&self) -> bool {
        self.code >= 400
    }

    /// Error for a reply the caller did not expect
    pub fn into_error(self) -> NntpError {
        NntpError::from_reply(self.code, self.message)
    }
}

/// Reply whose body is kept as raw bytes
///
/// ARTICLE and HEAD bodies may be in any charset, so they are not decoded
/// here. Dot-stuffing is already removed and lines end in CRLF.
#[derive(Debug, Clone)]
pub struct NntpBinaryResponse {
    pub code: u16,
    pub message: String,
    pub data: Vec<u8>,
}

impl NntpBinaryResponse {
    pub fn class(&self) -> ReplyClass {
        ReplyClass::of(self.code)
    }

    pub fn is_success(&self) -> bool {
        self.class() == ReplyClass::Completed
    }

    /// Error for a reply the caller did not expect
    pub fn into_error(self) -> NntpError {
        NntpError::from_reply(self.code, self.message)
    }
}

/// Reply codes the client checks for (RFC 3977, RFC 4643)
pub mod codes {
    // greeting and QUIT
    pub const READY_POSTING_ALLOWED: u16 = 200;
    pub const READY_NO_POSTING: u16 = 201;
    pub const CLOSING_CONNECTION: u16 = 205;

    // GROUP, LIST
    pub const GROUP_SELECTED: u16 = 211;
    pub const LIST_INFORMATION_FOLLOWS: u16 = 215;

    // ARTICLE, HEAD, OVER
    pub const ARTICLE_FOLLOWS: u16 = 220;
    pub const HEAD_FOLLOWS: u16 = 221;
    pub const OVERVIEW_INFO_FOLLOWS: u16 = 224;

    // POST
    pub const ARTICLE_POSTED: u16 = 240;
    pub const SEND_ARTICLE: u16 = 340;
    pub const POSTING_NOT_PERMITTED: u16 = 440;
    pub const POSTING_FAILED: u16 = 441;

    // AUTHINFO
    pub const AUTH_ACCEPTED: u16 = 281;
    pub const AUTH_CONTINUE: u16 = 381;
    pub const AUTH_REJECTED: u16 = 481;

    pub const COMMAND_NOT_RECOGNIZED: u16 = 500;
}
