//! Server and gateway configuration

use std::time::Duration;

/// Default read/write/connect timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// NNTP server configuration
///
/// Contains all the information needed to connect to an NNTP server.
///
/// # Example
///
/// ```
/// use ftngate::ServerConfig;
/// use std::time::Duration;
///
/// let config = ServerConfig::plain("news.example.com", "gate", "secret")
///     .with_timeout(Duration::from_secs(10));
/// assert_eq!(config.port, 119);
/// assert!(!config.tls);
/// ```
#[must_use]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServerConfig {
    /// Server hostname (e.g., "news.example.com")
    pub host: String,

    /// Server port (typically 119 for plain, 563 for TLS)
    pub port: u16,

    /// Wrap the connection in implicit TLS
    #[cfg_attr(feature = "serde", serde(default))]
    pub tls: bool,

    /// Accept any server certificate
    ///
    /// **Security Warning:** disables certificate validation. Only for
    /// servers with self-signed certificates on a trusted network.
    #[cfg_attr(feature = "serde", serde(default))]
    pub allow_insecure_tls: bool,

    /// Username for AUTHINFO; empty means the server needs no login
    #[cfg_attr(feature = "serde", serde(default))]
    pub username: String,

    /// Password for AUTHINFO
    #[cfg_attr(feature = "serde", serde(default))]
    pub password: String,

    /// Bound on connect, every command and every response
    #[cfg_attr(feature = "serde", serde(default = "default_timeout", with = "timeout_secs"))]
    pub timeout: Duration,
}

#[cfg(feature = "serde")]
fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

#[cfg(feature = "serde")]
mod timeout_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(
        host: impl Into<String>,
        port: u16,
        tls: bool,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            tls,
            allow_insecure_tls: false,
            username: username.into(),
            password: password.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// TLS connection on the standard secure port (563)
    pub fn tls(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::new(host, 563, true, username, password)
    }

    /// Plain connection on the standard port (119)
    ///
    /// **Warning:** credentials travel in clear text.
    pub fn plain(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::new(host, 119, false, username, password)
    }

    /// TLS configuration that accepts self-signed certificates
    pub fn tls_insecure(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let mut config = Self::tls(host, username, password);
        config.allow_insecure_tls = true;
        config
    }

    /// Replace the I/O timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether credentials are configured
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty()
    }
}

/// Per-run gateway settings, as read from the operator's configuration
///
/// Turned into a validated [`TranslationContext`](crate::gateway::TranslationContext)
/// with [`TranslationContext::from_config`](crate::gateway::TranslationContext::from_config).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GatewayConfig {
    /// This gateway's FidoNet address, e.g. "2:5020/1042.7"
    pub gateway_address: String,
    /// The uplink that receives outbound packets
    pub linked_address: String,
    /// Text of the " * Origin:" line, without the address
    pub origin_line: String,
    /// Software name used in PID/TID, tear line and X-Gateway
    #[cfg_attr(feature = "serde", serde(default = "default_software"))]
    pub software: String,
    /// Software version
    #[cfg_attr(feature = "serde", serde(default = "default_version"))]
    pub version: String,
    /// Address placed in From when a FidoNet author has none
    pub gate_email: String,
    /// Packet password, at most 8 bytes
    #[cfg_attr(feature = "serde", serde(default))]
    pub packet_password: String,
    /// Zone assumed for addresses written without one
    #[cfg_attr(feature = "serde", serde(default = "default_zone"))]
    pub default_zone: u16,
    /// Host used for synthesized identifiers; defaults to the gate e-mail domain
    #[cfg_attr(feature = "serde", serde(default))]
    pub hostname: Option<String>,
}

#[cfg(feature = "serde")]
fn default_software() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

#[cfg(feature = "serde")]
fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(feature = "serde")]
fn default_zone() -> u16 {
    2
}

impl GatewayConfig {
    /// Configuration with the crate's name and version as gateway software
    pub fn new(
        gateway_address: impl Into<String>,
        linked_address: impl Into<String>,
        gate_email: impl Into<String>,
    ) -> Self {
        Self {
            gateway_address: gateway_address.into(),
            linked_address: linked_address.into(),
            origin_line: String::new(),
            software: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            gate_email: gate_email.into(),
            packet_password: String::new(),
            default_zone: 2,
            hostname: None,
        }
    }

    /// Set the origin line text
    pub fn with_origin(mut self, origin_line: impl Into<String>) -> Self {
        self.origin_line = origin_line.into();
        self
    }

    /// Set the packet password
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.packet_password = password.into();
        self
    }
}
