//! Status line parsing

use crate::error::{NntpError, Result};
use crate::response::NntpResponse;

/// Parse NNTP response line into code and message
pub fn parse_response_line(line: &str) -> Result<(u16, String)> {
    // Some proxies prepend a BOM
    let line = line.trim_start_matches('\u{FEFF}');

    let bytes = line.as_bytes();
    if bytes.len() < 3 || !bytes[..3].iter().all(u8::is_ascii_digit) {
        return Err(NntpError::InvalidResponse(line.chars().take(100).collect()));
    }
    // "99999" must not parse as 999
    if bytes.get(3).is_some_and(u8::is_ascii_digit) {
        return Err(NntpError::InvalidResponse(line.chars().take(100).collect()));
    }

    let code = line[..3]
        .parse::<u16>()
        .map_err(|_| NntpError::InvalidResponse(line.chars().take(100).collect()))?;
    let message = match bytes.get(3) {
        Some(b' ') => line[4..].to_string(),
        Some(_) => line[3..].to_string(),
        None => String::new(),
    };

    Ok((code, message))
}

/// Parse single-line NNTP response
pub fn parse_single_response(line: &str) -> Result<NntpResponse> {
    let (code, message) = parse_response_line(line)?;
    Ok(NntpResponse {
        code,
        message,
        lines: vec![],
    })
}

/// Fail with the code-classified error unless the response has `expected`
pub fn expect_code(response: NntpResponse, expected: u16) -> Result<NntpResponse> {
    if response.code == expected {
        Ok(response)
    } else {
        Err(response.into_error())
    }
}
