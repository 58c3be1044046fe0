//! AUTHINFO USER/PASS authentication (RFC 4643 §2.3)

use super::NntpClient;
use super::state::ConnectionState;
use crate::commands;
use crate::error::{NntpError, Result};
use crate::response::codes;
use tracing::debug;

impl NntpClient {
    /// Authenticate with the credentials from the client configuration
    ///
    /// Does nothing when no username is configured.
    ///
    /// # Errors
    ///
    /// - [`NntpError::AuthFailed`] - credentials rejected
    /// - [`NntpError::ConnectionClosed`] - server closed the connection
    /// - [`NntpError::Timeout`] - server did not respond in time
    pub async fn authenticate(&mut self) -> Result<()> {
        if !self.config.has_credentials() {
            debug!("No credentials configured, skipping AUTHINFO");
            return Ok(());
        }
        let config = self.config.clone();
        self.login(&config.username, &config.password).await
    }

    /// Authenticate with AUTHINFO USER, then AUTHINFO PASS if asked for
    ///
    /// 281 after USER completes the login; 381 sends PASS, which must be
    /// answered with 281. Any other reply is an authentication failure.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        debug!("Authenticating as {}", username);

        if self.state == ConnectionState::Authenticated {
            return Ok(());
        }

        let response = self.command(&commands::authinfo_user(username)).await?;
        match response.code {
            codes::AUTH_ACCEPTED => {}
            codes::AUTH_CONTINUE => {
                let response = self.command(&commands::authinfo_pass(password)).await?;
                if response.code != codes::AUTH_ACCEPTED {
                    return Err(NntpError::AuthFailed(format!(
                        "{} {}",
                        response.code, response.message
                    )));
                }
            }
            code => {
                return Err(NntpError::AuthFailed(format!(
                    "{} {}",
                    code, response.message
                )));
            }
        }

        self.state = ConnectionState::Authenticated;
        debug!("Authentication successful");
        Ok(())
    }
}
