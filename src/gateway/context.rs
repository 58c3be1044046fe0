//! Read-only per-run translation settings

use crate::address::Address;
use crate::bridge::domain_from_email;
use crate::config::GatewayConfig;
use crate::error::GatewayError;

/// Settings shared by every translation in one run
///
/// Built once with [`TranslationContext::from_config`] and passed by
/// reference; nothing in it changes while messages are converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationContext {
    /// This gateway's address
    pub gateway: Address,
    /// The uplink that receives outbound packets
    pub linked: Address,
    /// Origin line text, without the trailing address
    pub origin_line: String,
    pub software: String,
    pub version: String,
    /// Operating system name shown in the tear line and TID
    pub os: String,
    /// Address used in From and Sender of gated articles
    pub gate_email: String,
    /// Right-hand side of synthesized Message-IDs
    pub domain: String,
    /// Host used in synthesized MSGID serials
    pub hostname: String,
    /// Packet password, at most 8 bytes
    pub packet_password: String,
    pub default_zone: u16,
}

/// Display name of the running operating system
fn os_display_name() -> String {
    match std::env::consts::OS {
        "linux" => "Linux".to_string(),
        "windows" => "Windows".to_string(),
        "macos" => "macOS".to_string(),
        "freebsd" => "FreeBSD".to_string(),
        other => other.to_string(),
    }
}

impl TranslationContext {
    /// Validate a [`GatewayConfig`]
    ///
    /// # Errors
    ///
    /// [`GatewayError::Address`] when either configured address is malformed.
    ///
    /// ```
    /// use ftngate::config::GatewayConfig;
    /// use ftngate::gateway::TranslationContext;
    ///
    /// let config = GatewayConfig::new("2:5020/1042", "2:5020/52", "gate@fido.example.org")
    ///     .with_origin("Example gate");
    /// let ctx = TranslationContext::from_config(&config).unwrap();
    /// assert_eq!(ctx.domain, "fido.example.org");
    /// assert_eq!(ctx.origin_text(), "Example gate (2:5020/1042)");
    ///
    /// let bad = GatewayConfig::new("not an address", "2:5020/52", "gate@x");
    /// assert!(TranslationContext::from_config(&bad).is_err());
    /// ```
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let gateway = Address::parse(&config.gateway_address, config.default_zone)?;
        let linked = Address::parse(&config.linked_address, config.default_zone)?;

        let domain = domain_from_email(&config.gate_email).to_string();
        let hostname = config
            .hostname
            .clone()
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| domain.clone());

        Ok(Self {
            gateway,
            linked,
            origin_line: config.origin_line.clone(),
            software: config.software.clone(),
            version: config.version.clone(),
            os: os_display_name(),
            gate_email: config.gate_email.clone(),
            domain,
            hostname,
            packet_password: config.packet_password.clone(),
            default_zone: config.default_zone,
        })
    }

    /// Origin line contents: the configured text followed by our address
    pub fn origin_text(&self) -> String {
        if self.origin_line.is_empty() {
            format!("({})", self.gateway)
        } else {
            format!("{} ({})", self.origin_line, self.gateway)
        }
    }

    /// Tear line text, e.g. "ftngate Linux v0.1.0"
    pub fn tear_line(&self) -> String {
        format!("{} {} v{}", self.software, self.os, self.version)
    }

    /// PID kludge value
    pub fn pid(&self) -> String {
        format!("{} {}", self.software, self.version)
    }

    /// TID kludge value, e.g. "ftngate/Linux 0.1.0"
    pub fn tid(&self) -> String {
        format!("{}/{} {}", self.software, self.os, self.version)
    }
}
