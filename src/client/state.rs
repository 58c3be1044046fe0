//! Connection state for the NNTP client

/// Lifecycle of one NNTP connection
///
/// A client value only exists once the greeting has been read, so there
/// is no disconnected state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Greeting received, ready for commands
    Connected,
    /// AUTHINFO accepted
    Authenticated,
    /// QUIT sent; further commands fail with `ConnectionClosed`
    Closed,
}
