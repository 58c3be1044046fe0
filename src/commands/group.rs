//! GROUP command

use crate::error::{NntpError, Result};
use crate::response::{NntpResponse, codes};

/// Build GROUP command
pub fn group(newsgroup: &str) -> String {
    format!("GROUP {}\r\n", newsgroup)
}

/// Group information returned by the GROUP command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInfo {
    /// Estimated number of articles in the group
    pub count: u64,
    /// Number of the first article
    pub first: u64,
    /// Number of the last article
    pub last: u64,
    /// Group name as echoed by the server
    pub name: String,
}

/// Parse GROUP response
///
/// Response format: "211 count first last group-name"
pub fn parse_group_response(response: NntpResponse) -> Result<GroupInfo> {
    if response.code != codes::GROUP_SELECTED {
        return Err(response.into_error());
    }

    let parts: Vec<&str> = response.message.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(NntpError::InvalidResponse(response.message));
    }

    let number = |s: &str| {
        s.parse::<u64>()
            .map_err(|_| NntpError::InvalidResponse(response.message.clone()))
    };

    Ok(GroupInfo {
        count: number(parts[0])?,
        first: number(parts[1])?,
        last: number(parts[2])?,
        name: parts.get(3).map(|s| s.to_string()).unwrap_or_default(),
    })
}
