//! Article type definitions

use std::fmt::Write;

use chrono::{DateTime, FixedOffset};

use crate::encoded_words::decode_header_value;

/// Ordered, case-insensitive header list
///
/// Header order is preserved and repeated names are allowed, as in the
/// article itself.
///
/// ```
/// use ftngate::article::Headers;
///
/// let mut headers = Headers::new();
/// headers.append("Subject", "Hello");
/// headers.append("X-Trace", "one");
/// headers.append("x-trace", "two");
///
/// assert_eq!(headers.get("SUBJECT"), Some("Hello"));
/// assert_eq!(headers.get_all("X-Trace").collect::<Vec<_>>(), vec!["one", "two"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Create an empty header list
    pub fn new() -> Self {
        Self::default()
    }

    /// First value of a header
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Every value of a header, in order
    pub fn get_all<'a, 'b>(
        &'a self,
        name: &'b str,
    ) -> impl Iterator<Item = &'a str> + use<'a, 'b> {
        self.entries
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether a header is present
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Add a header at the end
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Replace the first occurrence of a header (dropping the rest), or append it
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            Some(pos) => {
                self.entries[pos].1 = value;
                let mut index = 0;
                self.entries.retain(|(n, _)| {
                    let keep = index <= pos || !n.eq_ignore_ascii_case(&name);
                    index += 1;
                    keep
                });
            }
            None => self.entries.push((name, value)),
        }
    }

    /// Remove every occurrence of a header
    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }

    /// Headers in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Headers as CRLF-terminated `Name: value` lines
    pub(crate) fn write_to(&self, out: &mut String) {
        for (name, value) in &self.entries {
            // write! to a String cannot fail
            let _ = write!(out, "{name}: {value}\r\n");
        }
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        }
    }
}

/// An article fetched from a news server
///
/// `body` is the decoded text: transfer encoding removed, converted from
/// the declared charset, and for multipart articles every `text/plain` part
/// joined in order. Line endings are `\n`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NntpArticle {
    /// Group the article was fetched from
    pub newsgroup: String,
    /// Article number in that group, if known
    pub number: Option<u64>,
    pub headers: Headers,
    pub body: String,
}

impl NntpArticle {
    /// Raw value of a header
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Subject with encoded words decoded
    pub fn subject(&self) -> String {
        self.headers
            .get("Subject")
            .map(decode_header_value)
            .unwrap_or_default()
    }

    pub fn message_id(&self) -> Option<&str> {
        self.headers.get("Message-ID").map(str::trim)
    }

    /// References header, whitespace separated
    pub fn references(&self) -> Option<&str> {
        self.headers
            .get("References")
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    /// Display name from the From header
    ///
    /// Handles `Name <addr>`, `"Name" <addr>`, `addr (Name)` and a bare
    /// address, in which case the local part is used.
    ///
    /// ```
    /// use ftngate::article::{Headers, NntpArticle};
    ///
    /// let mut article = NntpArticle::default();
    /// article.headers.append("From", "=?UTF-8?Q?Andr=C3=A9?= <andre@example.com>");
    /// assert_eq!(article.from_name(), "André");
    /// assert_eq!(article.from_email().as_deref(), Some("andre@example.com"));
    ///
    /// article.headers.insert("From", "joe@example.com (Joe Bloggs)");
    /// assert_eq!(article.from_name(), "Joe Bloggs");
    /// ```
    pub fn from_name(&self) -> String {
        let from = decode_header_value(self.headers.get("From").unwrap_or_default());
        let from = from.trim();

        if let Some(open) = from.find('<') {
            let name = from[..open].trim().trim_matches('"').trim();
            if !name.is_empty() {
                return name.to_string();
            }
        }
        if let (Some(open), Some(close)) = (from.find('('), from.rfind(')')) {
            if open < close {
                let name = from[open + 1..close].trim();
                if !name.is_empty() {
                    return name.to_string();
                }
            }
        }
        match self.from_email() {
            Some(email) => email
                .split_once('@')
                .map_or(email.clone(), |(local, _)| local.to_string()),
            None => from.to_string(),
        }
    }

    /// Mail address from the From header
    pub fn from_email(&self) -> Option<String> {
        let from = self.headers.get("From")?.trim();
        if let (Some(open), Some(close)) = (from.find('<'), from.rfind('>')) {
            if open < close {
                let email = from[open + 1..close].trim();
                return (!email.is_empty()).then(|| email.to_string());
            }
        }
        from.split_whitespace()
            .find(|token| token.contains('@'))
            .map(|token| token.trim_matches(|c| c == '<' || c == '>').to_string())
    }

    /// Date header parsed as RFC 2822
    ///
    /// Day names and trailing comments such as `(UTC)` are tolerated.
    pub fn date(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.headers.get("Date")?.trim();
        DateTime::parse_from_rfc2822(raw).ok().or_else(|| {
            let without_comment = raw.split('(').next().unwrap_or(raw).trim();
            DateTime::parse_from_rfc2822(without_comment).ok()
        })
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("Content-Type")
    }

    /// `charset` parameter of the Content-Type header
    pub fn charset(&self) -> Option<&str> {
        self.content_type()
            .and_then(|ct| content_type_param(ct, "charset"))
    }
}

/// Value of a `; name=value` parameter in a Content-Type style header
pub(crate) fn content_type_param<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case(name)
            .then(|| value.trim().trim_matches('"').trim_matches('\''))
    })
}
