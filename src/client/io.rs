//! Low-level I/O for NNTP protocol communication
//!
//! Command transmission, single-line and multi-line response reading, and
//! the dot-stuffing rules of RFC 3977 §3.1.1. Every read and write is
//! bounded by the configured timeout.

use super::NntpClient;
use super::state::ConnectionState;
use crate::commands;
use crate::error::{NntpError, Result};
use crate::response::{NntpBinaryResponse, NntpResponse};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tracing::trace;

const LINE_CAPACITY: usize = 512;
const ARTICLE_INITIAL_CAPACITY: usize = 16 * 1024;

/// Strip the line terminator (CRLF or bare LF) from a raw line
fn line_content(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r\n")
        .or_else(|| line.strip_suffix(b"\n"))
        .unwrap_or(line)
}

/// Remove NNTP dot-stuffing from one received line
///
/// Returns `None` for the lone "." terminator.
fn unstuff_line(content: &[u8]) -> Option<&[u8]> {
    match content {
        b"." => None,
        [b'.', rest @ ..] if rest.first() == Some(&b'.') => Some(rest),
        _ => Some(content),
    }
}

/// Convert article bytes to wire form: CRLF line endings, a leading "."
/// doubled on every line
///
/// Lines may end in CRLF, LF or a lone CR. The terminating ".\r\n" is not
/// appended.
pub(super) fn dot_stuff(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + data.len() / 40 + 2);
    if data.is_empty() {
        return out;
    }
    let mut rest = data
        .strip_suffix(b"\r\n")
        .or_else(|| data.strip_suffix(b"\n"))
        .or_else(|| data.strip_suffix(b"\r"))
        .unwrap_or(data);
    loop {
        let end = rest.iter().position(|&b| b == b'\r' || b == b'\n');
        let line = &rest[..end.unwrap_or(rest.len())];
        if line.first() == Some(&b'.') {
            out.push(b'.');
        }
        out.extend_from_slice(line);
        out.extend_from_slice(b"\r\n");

        let Some(end) = end else {
            break;
        };
        let crlf = rest[end] == b'\r' && rest.get(end + 1) == Some(&b'\n');
        let next = if crlf { end + 2 } else { end + 1 };
        rest = &rest[next..];
    }
    out
}

impl NntpClient {
    /// Send a command line to the server
    pub(super) async fn send_command(&mut self, command: &str) -> Result<()> {
        if self.state == ConnectionState::Closed {
            return Err(NntpError::ConnectionClosed);
        }
        trace!("Sending command: {}", commands::redact(command));
        self.write_all(command.as_bytes()).await
    }

    /// Write raw bytes (article data) without logging them line by line
    pub(super) async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        let limit = self.config.timeout;
        let stream = self.stream.get_mut();
        let write = async {
            stream.write_all(data).await?;
            stream.flush().await?;
            Ok(())
        };
        timeout(limit, write).await.map_err(|_| NntpError::Timeout)?
    }

    /// Read one raw line, failing with `ConnectionClosed` on EOF
    async fn read_line_bytes(&mut self) -> Result<Vec<u8>> {
        let mut line = Vec::with_capacity(LINE_CAPACITY);
        self.stream.read_until(b'\n', &mut line).await?;
        if line.is_empty() {
            return Err(NntpError::ConnectionClosed);
        }
        Ok(line)
    }

    /// Read and parse a status line
    async fn read_status_line(&mut self) -> Result<(u16, String)> {
        let line_bytes = self.read_line_bytes().await?;
        let line = String::from_utf8_lossy(line_content(&line_bytes));
        trace!("Received: {}", line);
        commands::parse_response_line(&line)
    }

    /// Read a single-line response
    pub(super) async fn read_response(&mut self) -> Result<NntpResponse> {
        let limit = self.config.timeout;
        let read = async {
            let (code, message) = self.read_status_line().await?;
            Ok(NntpResponse {
                code,
                message,
                lines: vec![],
            })
        };
        timeout(limit, read).await.map_err(|_| NntpError::Timeout)?
    }

    /// Read a multi-line response as text lines
    ///
    /// Only 2xx status lines are followed by a data block; for any other
    /// code the response is returned with no lines.
    pub(super) async fn read_multiline_response(&mut self) -> Result<NntpResponse> {
        let limit = self.config.timeout;
        let read = async {
            let (code, message) = self.read_status_line().await?;
            let mut lines = Vec::new();
            if (200..300).contains(&code) {
                loop {
                    let raw = self.read_line_bytes().await?;
                    match unstuff_line(line_content(&raw)) {
                        Some(content) => lines.push(String::from_utf8_lossy(content).into_owned()),
                        None => break,
                    }
                }
            }
            Ok(NntpResponse {
                code,
                message,
                lines,
            })
        };
        timeout(limit, read).await.map_err(|_| NntpError::Timeout)?
    }

    /// Read a multi-line response as raw bytes
    ///
    /// Lines are unstuffed and rejoined with CRLF, so the data keeps the
    /// article's original bytes whatever their charset.
    pub(super) async fn read_multiline_response_binary(&mut self) -> Result<NntpBinaryResponse> {
        let limit = self.config.timeout;
        let read = async {
            let (code, message) = self.read_status_line().await?;
            let mut data = Vec::new();
            if (200..300).contains(&code) {
                data.reserve(ARTICLE_INITIAL_CAPACITY);
                loop {
                    let raw = self.read_line_bytes().await?;
                    match unstuff_line(line_content(&raw)) {
                        Some(content) => {
                            data.extend_from_slice(content);
                            data.extend_from_slice(b"\r\n");
                        }
                        None => break,
                    }
                }
            }
            trace!("Received {} bytes of data", data.len());
            Ok(NntpBinaryResponse {
                code,
                message,
                data,
            })
        };
        timeout(limit, read).await.map_err(|_| NntpError::Timeout)?
    }

    /// Send a command and read its single-line response
    pub(super) async fn command(&mut self, command: &str) -> Result<NntpResponse> {
        self.send_command(command).await?;
        self.read_response().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_content() {
        assert_eq!(line_content(b"abc\r\n"), b"abc");
        assert_eq!(line_content(b"abc\n"), b"abc");
        assert_eq!(line_content(b"abc"), b"abc");
        assert_eq!(line_content(b"\r\n"), b"");
    }

    #[test]
    fn test_unstuff_line() {
        assert_eq!(unstuff_line(b"."), None);
        assert_eq!(unstuff_line(b".."), Some(&b"."[..]));
        assert_eq!(unstuff_line(b"..text"), Some(&b".text"[..]));
        assert_eq!(unstuff_line(b".text"), Some(&b".text"[..]));
        assert_eq!(unstuff_line(b"plain"), Some(&b"plain"[..]));
        assert_eq!(unstuff_line(b""), Some(&b""[..]));
    }

    #[test]
    fn test_dot_stuff() {
        assert_eq!(dot_stuff(b"a\r\n.\r\nb\r\n"), b"a\r\n..\r\nb\r\n");
        assert_eq!(dot_stuff(b"a\n..x\n"), b"a\r\n...x\r\n");
        assert_eq!(dot_stuff(b"no newline"), b"no newline\r\n");
        assert_eq!(dot_stuff(b""), b"");
    }

    #[test]
    fn test_dot_stuff_bare_cr_lines() {
        assert_eq!(dot_stuff(b"a\r.b\r"), b"a\r\n..b\r\n");
        assert_eq!(dot_stuff(b"x\r\r.\ry"), b"x\r\n\r\n..\r\ny\r\n");
        assert_eq!(dot_stuff(b"mixed\n.one\r\n.two\rend"), b"mixed\r\n..one\r\n..two\r\nend\r\n");
    }

    #[test]
    fn test_dot_stuff_keeps_blank_lines() {
        assert_eq!(dot_stuff(b"H: v\r\n\r\nbody\r\n"), b"H: v\r\n\r\nbody\r\n");
    }

    #[test]
    fn test_stuff_then_unstuff_restores_lines() {
        let stuffed = dot_stuff(b".\n..\nx\n");
        let lines: Vec<&[u8]> = stuffed
            .split_inclusive(|&b| b == b'\n')
            .filter_map(|l| unstuff_line(line_content(l)))
            .collect();
        assert_eq!(lines, vec![&b"."[..], &b".."[..], &b"x"[..]]);
    }
}
