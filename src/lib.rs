#![doc = include_str!("../README.md")]

/// FidoNet 4D addresses and SEEN-BY / PATH net lists
pub mod address;
/// Netnews articles: parsing fetched articles, building articles to post
pub mod article;
/// MSGID / Message-ID, charset and timezone translation
pub mod bridge;
mod client;
/// NNTP command builders and response parsers
pub mod commands;
/// Server and gateway configuration
pub mod config;
/// RFC 2047 Encoded Words support for international headers
pub mod encoded_words;
mod error;
/// FidoNet message / Usenet article translation and packing
pub mod gateway;
/// FTS-0001 type 2+ packet codec
pub mod packet;
mod response;

pub use address::Address;
pub use article::{Headers, NntpArticle, WireArticle, WireArticleBuilder};
pub use client::{AsyncStream, ConnectionState, NntpClient};
pub use commands::{ActiveGroup, GroupInfo, OverviewEntry};
pub use config::{GatewayConfig, ServerConfig};
pub use error::{AddressError, GatewayError, NntpError, PacketError, Result};
pub use packet::{FidoMessage, PacketHeader};
pub use response::{NntpBinaryResponse, NntpResponse, ReplyClass, codes};
