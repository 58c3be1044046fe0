//! Connection establishment for the NNTP client
//!
//! TCP connect, optional implicit TLS, and greeting validation.

use crate::config::ServerConfig;
use crate::error::{NntpError, Result};
use crate::response::codes;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use tokio_rustls::rustls::client::danger::{
    HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier,
};
use tokio_rustls::rustls::crypto::{CryptoProvider, ring};
use tokio_rustls::rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use tokio_rustls::rustls::{
    ClientConfig, DigitallySignedStruct, Error as TlsError, RootCertStore, SignatureScheme,
};
use tracing::{debug, warn};

use super::state::ConnectionState;
use super::{AsyncStream, NntpClient};

/// Verifier for `allow_insecure_tls`: any certificate chain is accepted
///
/// Signatures are not checked either; the advertised schemes are those the
/// ring provider implements.
#[derive(Debug)]
pub(super) struct AcceptAnyCertificate {
    schemes: Vec<SignatureScheme>,
}

impl AcceptAnyCertificate {
    fn new(provider: &CryptoProvider) -> Self {
        Self {
            schemes: provider.signature_verification_algorithms.supported_schemes(),
        }
    }
}

impl ServerCertVerifier for AcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, TlsError> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, TlsError> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, TlsError> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.schemes.clone()
    }
}

/// rustls client configuration for the server's security settings
fn tls_config(config: &ServerConfig) -> ClientConfig {
    let provider = ring::default_provider();

    if config.allow_insecure_tls {
        warn!(
            "TLS certificate validation disabled for {}, connection is open to interception",
            config.host
        );
        let verifier = AcceptAnyCertificate::new(&provider);
        let _ = CryptoProvider::install_default(provider);
        ClientConfig::builder()
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(verifier))
            .with_no_client_auth()
    } else {
        let _ = CryptoProvider::install_default(provider);
        let mut root_store = RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth()
    }
}

impl NntpClient {
    /// Connect to the NNTP server named in `config` and read its greeting
    ///
    /// Uses implicit TLS when `config.tls` is set. Does not authenticate;
    /// call [`authenticate`](Self::authenticate) afterwards if the server
    /// requires it.
    ///
    /// # Errors
    ///
    /// - [`NntpError::Io`] - TCP connection fails
    /// - [`NntpError::Tls`] - TLS handshake fails
    /// - [`NntpError::Timeout`] - connect, handshake or greeting exceeded `config.timeout`
    /// - [`NntpError::Temporary`] / [`NntpError::Permanent`] - the greeting refused service
    pub async fn connect(config: Arc<ServerConfig>) -> Result<Self> {
        debug!("Connecting to NNTP server {}:{}", config.host, config.port);

        let addr = (config.host.as_str(), config.port);
        let tcp_stream = timeout(config.timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| NntpError::Timeout)??;
        tcp_stream.set_nodelay(true)?;

        if !config.tls {
            return Self::from_stream(tcp_stream, config).await;
        }

        let connector = TlsConnector::from(Arc::new(tls_config(&config)));
        let server_name = ServerName::try_from(config.host.clone())
            .map_err(|e| NntpError::Tls(format!("Invalid domain: {}", e)))?;

        let tls_stream = timeout(config.timeout, connector.connect(server_name, tcp_stream))
            .await
            .map_err(|_| NntpError::Timeout)?
            .map_err(|e| NntpError::Tls(format!("TLS handshake failed: {}", e)))?;

        Self::from_stream(tls_stream, config).await
    }

    /// Wrap an already-open stream and read the server greeting
    ///
    /// Accepts 200 (posting allowed) and 201 (no posting).
    pub async fn from_stream<S>(stream: S, config: Arc<ServerConfig>) -> Result<Self>
    where
        S: AsyncStream + 'static,
    {
        let boxed: Box<dyn AsyncStream> = Box::new(stream);
        let mut client = Self {
            stream: BufReader::new(boxed),
            state: ConnectionState::Connected,
            config,
            current_group: None,
            posting_allowed: false,
        };

        let greeting = client.read_response().await?;
        debug!("Server greeting: {} {}", greeting.code, greeting.message);

        match greeting.code {
            codes::READY_POSTING_ALLOWED => client.posting_allowed = true,
            codes::READY_NO_POSTING => {}
            _ => return Err(greeting.into_error()),
        }

        Ok(client)
    }
}
