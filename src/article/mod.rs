//! Netnews articles
//!
//! Reference: RFC 5536 (article format), RFC 2045 (transfer encodings),
//! RFC 2046 (multipart).
//!
//! This module is organized into:
//! - `types`: [`Headers`] and the fetched [`NntpArticle`]
//! - `parsing`: raw article bytes to [`NntpArticle`]
//! - `builder`: [`WireArticle`] and its builder, for posting

mod builder;
mod parsing;
mod types;

pub use self::builder::{WireArticle, WireArticleBuilder};
pub use self::parsing::{
    decode_quoted_printable, parse_article, parse_comma_list, parse_headers, split_article,
};
pub use self::types::{Headers, NntpArticle};
