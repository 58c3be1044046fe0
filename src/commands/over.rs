//! OVER/XOVER commands and overview data parsing

use crate::error::{NntpError, Result};

/// Build OVER command (RFC 3977 §8.3)
pub fn over(range: &str) -> String {
    format!("OVER {}\r\n", range)
}

/// Build XOVER command, the pre-RFC 3977 name for OVER
pub fn xover(range: &str) -> String {
    format!("XOVER {}\r\n", range)
}

/// One line of overview data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewEntry {
    /// Article number within the newsgroup
    pub article_number: u64,
    pub subject: String,
    /// From header
    pub author: String,
    pub date: String,
    pub message_id: String,
    /// References, space separated
    pub references: String,
    /// Article size in bytes
    pub bytes: u64,
    /// Body line count
    pub lines: u64,
}

/// Parse one overview line
///
/// Format: "number\tsubject\tfrom\tdate\tmessage-id\treferences\tbytes\tlines[\t...]"
pub fn parse_overview_line(line: &str) -> Result<OverviewEntry> {
    let parts: Vec<&str> = line.split('\t').collect();
    if parts.len() < 8 {
        return Err(NntpError::InvalidResponse(line.to_string()));
    }

    let article_number = parts[0]
        .trim()
        .parse()
        .map_err(|_| NntpError::InvalidResponse(line.to_string()))?;

    Ok(OverviewEntry {
        article_number,
        subject: parts[1].to_string(),
        author: parts[2].to_string(),
        date: parts[3].to_string(),
        message_id: parts[4].to_string(),
        references: parts[5].to_string(),
        bytes: parts[6].trim().parse().unwrap_or(0),
        lines: parts[7].trim().parse().unwrap_or(0),
    })
}
