//! Listing commands: OVER/XOVER, LIST, and QUIT

use super::NntpClient;
use super::state::ConnectionState;
use crate::commands::{self, ActiveGroup, OverviewEntry};
use crate::error::{NntpError, Result};
use crate::response::{NntpResponse, codes};
use tracing::{debug, warn};

/// Parse the lines of a 224 response, skipping malformed ones
fn parse_overview(response: NntpResponse) -> Vec<OverviewEntry> {
    response
        .lines
        .iter()
        .filter_map(|line| match commands::parse_overview_line(line) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping overview line: {}", e);
                None
            }
        })
        .collect()
}

impl NntpClient {
    /// Overview data for an article range in the current group
    ///
    /// Tries `OVER`; if the server answers with any 4xx or 5xx code the
    /// request is repeated as `XOVER` for servers that predate RFC 3977.
    ///
    /// `range` is e.g. "100-200" or "100-".
    pub async fn overview(&mut self, range: &str) -> Result<Vec<OverviewEntry>> {
        debug!("Requesting overview for {}", range);

        self.send_command(&commands::over(range)).await?;
        let mut response = self.read_multiline_response().await?;

        if response.is_error() {
            debug!("OVER answered {}, retrying with XOVER", response.code);
            self.send_command(&commands::xover(range)).await?;
            response = self.read_multiline_response().await?;
        }

        if response.code != codes::OVERVIEW_INFO_FOLLOWS {
            return Err(response.into_error());
        }

        let entries = parse_overview(response);
        debug!("Retrieved {} overview entries", entries.len());
        Ok(entries)
    }

    /// List active newsgroups (RFC 3977 §7.6.3)
    pub async fn list(&mut self) -> Result<Vec<ActiveGroup>> {
        debug!("Listing active groups");

        self.send_command(commands::list()).await?;
        let response = self.read_multiline_response().await?;
        let groups = commands::parse_list_response(response)?;

        debug!("Retrieved {} active groups", groups.len());
        Ok(groups)
    }

    /// Send QUIT and mark the connection closed
    ///
    /// Commands issued afterwards fail with [`NntpError::ConnectionClosed`].
    /// A server that drops the connection instead of answering 205 is not
    /// treated as an error.
    pub async fn quit(&mut self) -> Result<()> {
        if self.state == ConnectionState::Closed {
            return Ok(());
        }
        debug!("Closing connection");

        let result = self.command(commands::quit()).await;
        self.state = ConnectionState::Closed;
        self.current_group = None;

        match result {
            Ok(response) if response.code == codes::CLOSING_CONNECTION => Ok(()),
            Ok(response) => Err(response.into_error()),
            Err(e @ (NntpError::ConnectionClosed | NntpError::Io(_))) => {
                debug!("Connection already gone at QUIT: {}", e);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
