//! LIST command and active file parsing

use crate::error::Result;
use crate::response::{NntpResponse, codes};

/// Build LIST command
pub fn list() -> &'static str {
    "LIST\r\n"
}

/// Active newsgroup entry from LIST
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveGroup {
    /// Newsgroup name
    pub name: String,
    /// Highest article number
    pub high: u64,
    /// Lowest article number
    pub low: u64,
    /// Posting status: "y", "n", "m", or "=other.group" for aliases
    pub status: String,
}

/// Parse a LIST response
///
/// Line format: "group high low status". Malformed lines are skipped.
pub fn parse_list_response(response: NntpResponse) -> Result<Vec<ActiveGroup>> {
    if response.code != codes::LIST_INFORMATION_FOLLOWS {
        return Err(response.into_error());
    }

    Ok(response
        .lines
        .iter()
        .filter_map(|line| parse_active_line(line))
        .collect())
}

fn parse_active_line(line: &str) -> Option<ActiveGroup> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let [name, high, low, status, ..] = parts.as_slice() else {
        return None;
    };
    Some(ActiveGroup {
        name: name.to_string(),
        high: high.parse().ok()?,
        low: low.parse().ok()?,
        status: status.to_string(),
    })
}
