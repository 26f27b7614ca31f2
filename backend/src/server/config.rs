//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use backend::settings::{RelaySettings, SettingsError};

/// Validated configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) settings: RelaySettings,
}

impl ServerConfig {
    /// Validate loaded settings into a server configuration.
    ///
    /// # Errors
    /// Returns [`SettingsError`] when the bind address cannot be parsed.
    pub fn from_settings(settings: RelaySettings) -> Result<Self, SettingsError> {
        let bind_addr = settings.bind_addr()?;
        Ok(Self {
            bind_addr,
            settings,
        })
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_is_validated_up_front() {
        let settings = RelaySettings {
            bind_addr: Some("127.0.0.1:0".to_owned()),
            ..RelaySettings::default()
        };
        let config = ServerConfig::from_settings(settings).expect("valid settings");
        assert_eq!(config.bind_addr().port(), 0);

        let broken = RelaySettings {
            bind_addr: Some("nowhere".to_owned()),
            ..RelaySettings::default()
        };
        assert!(ServerConfig::from_settings(broken).is_err());
    }
}
