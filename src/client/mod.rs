//! NNTP client implementation with optional TLS
//!
//! The client is strictly lock-step: every call sends one command and
//! consumes its complete response before returning.

mod articles;
mod auth;
mod connection;
mod group_ops;
mod io;
mod listing;
mod posting;
mod state;

use crate::config::ServerConfig;
pub use state::ConnectionState;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tracing::debug;

/// Byte stream an [`NntpClient`] can run over
///
/// Implemented for every `AsyncRead + AsyncWrite` type, so a TCP stream,
/// a TLS stream, or an in-memory duplex pipe all qualify.
pub trait AsyncStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> AsyncStream for T {}

/// Async NNTP client
///
/// # Example
///
/// ```no_run
/// use ftngate::{NntpClient, ServerConfig};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ServerConfig::tls("news.example.com", "user", "pass");
/// let mut client = NntpClient::connect(Arc::new(config)).await?;
/// client.authenticate().await?;
///
/// let info = client.select_group("fido.test").await?;
/// println!("Group has {} articles", info.count);
/// client.quit().await?;
/// # Ok(())
/// # }
/// ```
#[must_use]
pub struct NntpClient {
    /// Reader and writer halves of the connection
    stream: BufReader<Box<dyn AsyncStream>>,
    state: ConnectionState,
    config: Arc<ServerConfig>,
    /// Currently selected newsgroup
    current_group: Option<String>,
    /// Whether the greeting allowed posting (200 rather than 201)
    posting_allowed: bool,
}

impl NntpClient {
    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Get the currently selected newsgroup, if any
    pub fn current_group(&self) -> Option<&str> {
        self.current_group.as_deref()
    }

    /// Check if the client is currently authenticated
    pub fn is_authenticated(&self) -> bool {
        self.state == ConnectionState::Authenticated
    }

    /// Whether the server greeting advertised posting
    pub fn posting_allowed(&self) -> bool {
        self.posting_allowed
    }
}

impl Drop for NntpClient {
    fn drop(&mut self) {
        debug!("NntpClient dropped in state {:?}", self.state);
    }
}
