use super::NntpClient;
use super::io::dot_stuff;
use crate::article::WireArticle;
use crate::commands;
use crate::response::codes;
use crate::Result;
use tracing::debug;

impl NntpClient {
    /// Post an article (RFC 3977 §6.3.1)
    ///
    /// `article` is the unstuffed article text, headers and body, with any
    /// line endings. It is sent with CRLF endings, a leading "." doubled on
    /// each line, and a final "." line.
    ///
    /// 1. `POST`, which must be answered with 340
    /// 2. the article data
    /// 3. the server answers 240 on success
    ///
    /// # Errors
    ///
    /// - [`NntpError::Temporary`](crate::NntpError::Temporary) - 440 posting not permitted, 441 posting failed
    /// - [`NntpError::Permanent`](crate::NntpError::Permanent) - 5xx replies
    /// - [`NntpError::Protocol`](crate::NntpError::Protocol) - any other unexpected code
    pub async fn post(&mut self, article: &[u8]) -> Result<()> {
        debug!("Posting article ({} bytes)", article.len());

        let response = self.command(commands::post()).await?;
        commands::expect_code(response, codes::SEND_ARTICLE)?;

        let mut data = dot_stuff(article);
        data.extend_from_slice(b".\r\n");
        self.write_all(&data).await?;

        let response = self.read_response().await?;
        commands::expect_code(response, codes::ARTICLE_POSTED)?;

        debug!("Article posted successfully");
        Ok(())
    }

    /// Post a [`WireArticle`]
    pub async fn post_article(&mut self, article: &WireArticle) -> Result<()> {
        if let Some(id) = article.headers.get("Message-ID") {
            debug!("Posting {}", id);
        }
        self.post(&article.to_bytes()).await
    }
}

