//! Outbound articles
//!
//! [`WireArticle`] is an article ready for POST. Its body is kept
//! unstuffed; dot-stuffing happens once, when the article is transmitted.

use chrono::Utc;
use uuid::Uuid;

use super::types::Headers;
use crate::{NntpError, Result};

/// An article to be posted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireArticle {
    /// Headers in the order they will be sent
    pub headers: Headers,
    /// Body text, any line ending style
    pub body: String,
}

impl WireArticle {
    /// The article as CRLF text without dot-stuffing
    ///
    /// This is the form [`NntpClient::post`](crate::NntpClient::post)
    /// expects; the client stuffs lines as it sends them.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = String::with_capacity(1024 + self.body.len());
        self.headers.write_to(&mut out);
        out.push_str("\r\n");
        for line in self.body.lines() {
            out.push_str(line);
            out.push_str("\r\n");
        }
        out.into_bytes()
    }

    /// The article in wire form: CRLF line endings and dot-stuffed lines
    ///
    /// The terminating `.` line is not included.
    ///
    /// ```
    /// use ftngate::article::WireArticleBuilder;
    ///
    /// let article = WireArticleBuilder::new()
    ///     .from("user@example.com")
    ///     .subject("Test")
    ///     .newsgroups(["test.group"])
    ///     .body("Hello\n.\n..dots")
    ///     .build()
    ///     .unwrap();
    ///
    /// let wire = article.serialize_for_posting();
    /// assert!(wire.ends_with("\r\nHello\r\n..\r\n...dots\r\n"));
    /// ```
    pub fn serialize_for_posting(&self) -> String {
        let mut out = String::with_capacity(1024 + self.body.len());
        self.headers.write_to(&mut out);
        out.push_str("\r\n");
        for line in self.body.lines() {
            if line.starts_with('.') {
                out.push('.');
            }
            out.push_str(line);
            out.push_str("\r\n");
        }
        out
    }
}

/// Builder for [`WireArticle`]
///
/// Headers are emitted in the order: From, Newsgroups, Subject, Date,
/// Message-ID, then every other header in the order it was set.
#[derive(Debug, Clone, Default)]
pub struct WireArticleBuilder {
    from: Option<String>,
    newsgroups: Vec<String>,
    subject: Option<String>,
    date: Option<String>,
    message_id: Option<String>,
    extra: Headers,
    body: String,
}

impl WireArticleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the From header (required)
    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Set the Newsgroups header (required, at least one group)
    pub fn newsgroups<I, S>(mut self, newsgroups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.newsgroups = newsgroups.into_iter().map(Into::into).collect();
        self
    }

    /// Set the Subject header (required)
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the Date header (default: now, UTC)
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Set the Message-ID header (default: a random id in the From domain)
    pub fn message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    /// Add any other header; setting a name again replaces it
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Build the article
    ///
    /// # Errors
    ///
    /// [`NntpError::InvalidResponse`] when From, Subject or Newsgroups is
    /// missing.
    pub fn build(self) -> Result<WireArticle> {
        let from = self
            .from
            .ok_or_else(|| NntpError::InvalidResponse("From header is required".to_string()))?;
        let subject = self
            .subject
            .ok_or_else(|| NntpError::InvalidResponse("Subject header is required".to_string()))?;
        if self.newsgroups.is_empty() {
            return Err(NntpError::InvalidResponse(
                "At least one newsgroup is required".to_string(),
            ));
        }

        let date = self.date.unwrap_or_else(|| Utc::now().to_rfc2822());
        let message_id = self.message_id.unwrap_or_else(|| {
            let domain = from
                .rsplit_once('@')
                .map(|(_, d)| d.trim_end_matches('>').trim())
                .filter(|d| !d.is_empty())
                .unwrap_or("localhost");
            format!("<{}@{domain}>", Uuid::new_v4())
        });

        let mut headers = Headers::new();
        headers.append("From", from);
        headers.append("Newsgroups", self.newsgroups.join(","));
        headers.append("Subject", subject);
        headers.append("Date", date);
        headers.append("Message-ID", message_id);
        for (name, value) in self.extra.iter() {
            headers.append(name, value);
        }

        Ok(WireArticle {
            headers,
            body: self.body,
        })
    }
}
