//! Article retrieval: ARTICLE and HEAD

use super::NntpClient;
use crate::article::{Headers, NntpArticle, parse_article, parse_headers};
use crate::commands;
use crate::error::Result;
use crate::response::{NntpBinaryResponse, codes};
use tracing::debug;

/// Fail unless a data response carries the expected code
fn expect_data(response: NntpBinaryResponse, expected: u16) -> Result<NntpBinaryResponse> {
    if response.code == expected {
        Ok(response)
    } else {
        Err(response.into_error())
    }
}

impl NntpClient {
    /// Fetch and parse a complete article
    ///
    /// `spec` is an article number in the current group or a message-id.
    /// The raw bytes are unstuffed and then decoded with the article's own
    /// charset and transfer encoding.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use ftngate::{NntpClient, ServerConfig};
    /// # use std::sync::Arc;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = ServerConfig::plain("news.example.com", "", "");
    /// let mut client = NntpClient::connect(Arc::new(config)).await?;
    /// client.select_group("fido.test").await?;
    /// let article = client.fetch_article("42").await?;
    /// println!("{}: {}", article.from_name(), article.subject());
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// - [`NntpError::Temporary`](crate::NntpError::Temporary) - e.g. 423, no article with that number
    /// - [`NntpError::Timeout`](crate::NntpError::Timeout) - the article did not arrive in time
    pub async fn fetch_article(&mut self, spec: &str) -> Result<NntpArticle> {
        debug!("Fetching article {}", spec);

        self.send_command(&commands::article(spec)).await?;
        let response = self.read_multiline_response_binary().await?;
        let response = expect_data(response, codes::ARTICLE_FOLLOWS)?;

        let number = commands::article_number(&response.message)
            .or_else(|| spec.parse().ok());
        let newsgroup = self.current_group.clone().unwrap_or_default();

        Ok(parse_article(&response.data, &newsgroup, number))
    }

    /// Fetch an article's headers only
    pub async fn fetch_headers(&mut self, spec: &str) -> Result<Headers> {
        debug!("Fetching headers of {}", spec);

        self.send_command(&commands::head(spec)).await?;
        let response = self.read_multiline_response_binary().await?;
        let response = expect_data(response, codes::HEAD_FOLLOWS)?;

        Ok(parse_headers(&String::from_utf8_lossy(&response.data)))
    }
}
