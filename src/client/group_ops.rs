use crate::commands::{self, GroupInfo};
use crate::{NntpClient, Result};
use tracing::debug;

impl NntpClient {
    /// Select a newsgroup
    ///
    /// Returns [`GroupInfo`] with the article count and number range.
    ///
    /// # Errors
    ///
    /// - [`NntpError::Temporary`](crate::NntpError::Temporary) - e.g. 411, no such group
    /// - [`NntpError::InvalidResponse`](crate::NntpError::InvalidResponse) - malformed 211 line
    pub async fn select_group(&mut self, newsgroup: &str) -> Result<GroupInfo> {
        debug!("Selecting newsgroup: {}", newsgroup);

        let response = self.command(&commands::group(newsgroup)).await?;
        let mut info = commands::parse_group_response(response)?;
        if info.name.is_empty() {
            info.name = newsgroup.to_string();
        }
        self.current_group = Some(info.name.clone());

        debug!(
            "Group {} selected: {} articles ({}-{})",
            info.name, info.count, info.first, info.last
        );
        Ok(info)
    }
}
