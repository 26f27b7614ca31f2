//! Relay configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `RELAY_*` environment variables and
//! configuration files, in OrthoConfig's usual precedence. Every field is
//! optional; accessors apply defaults and validate formats.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::DEFAULT_WELCOME_MESSAGE;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PUBLISH_TIMEOUT_MS: u64 = 3_000;

/// Invalid configuration values.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        /// Configured value.
        value: String,
        /// Parser diagnostic.
        #[source]
        source: std::net::AddrParseError,
    },
    /// `gateway_control_url` is not an absolute URL.
    #[error("invalid gateway control URL {value:?}: {source}")]
    ControlUrl {
        /// Configured value.
        value: String,
        /// Parser diagnostic.
        #[source]
        source: url::ParseError,
    },
}

/// Configuration for the relay backend.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RELAY")]
pub struct RelaySettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PEM file holding the gateway's leaf certificate first.
    pub cert_pem_file: Option<PathBuf>,
    /// Pre-computed hex digest used when no PEM file is configured.
    pub cert_digest_hex: Option<String>,
    /// Base URL of the gateway control channel used to publish messages.
    pub gateway_control_url: Option<String>,
    /// Upper bound for one publish call, in milliseconds.
    pub publish_timeout_ms: Option<u64>,
    /// Text published to every newly connected client.
    pub welcome_message: Option<String>,
}

impl RelaySettings {
    /// Return the bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// Returns [`SettingsError::BindAddr`] when the value cannot be parsed.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Return the configured certificate PEM path, if any.
    pub fn cert_pem_file(&self) -> Option<&Path> {
        self.cert_pem_file.as_deref()
    }

    /// Return the configured hex digest, if any.
    pub fn cert_digest_hex(&self) -> Option<&str> {
        self.cert_digest_hex.as_deref()
    }

    /// Return the gateway control URL, if configured.
    ///
    /// # Errors
    /// Returns [`SettingsError::ControlUrl`] when the value is not an absolute
    /// URL.
    pub fn gateway_control_url(&self) -> Result<Option<Url>, SettingsError> {
        self.gateway_control_url
            .as_deref()
            .map(|value| {
                Url::parse(value).map_err(|source| SettingsError::ControlUrl {
                    value: value.to_owned(),
                    source,
                })
            })
            .transpose()
    }

    /// Return the publish timeout, falling back to three seconds.
    pub fn publish_timeout(&self) -> Duration {
        Duration::from_millis(
            self.publish_timeout_ms
                .unwrap_or(DEFAULT_PUBLISH_TIMEOUT_MS),
        )
    }

    /// Return the welcome text, falling back to the default greeting.
    pub fn welcome_message(&self) -> &str {
        self.welcome_message
            .as_deref()
            .unwrap_or(DEFAULT_WELCOME_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for relay configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 6] = [
        "RELAY_BIND_ADDR",
        "RELAY_CERT_PEM_FILE",
        "RELAY_CERT_DIGEST_HEX",
        "RELAY_GATEWAY_CONTROL_URL",
        "RELAY_PUBLISH_TIMEOUT_MS",
        "RELAY_WELCOME_MESSAGE",
    ];

    fn load_from_empty_args() -> RelaySettings {
        RelaySettings::load_from_iter([OsString::from("backend")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("valid")
        );
        assert!(settings.cert_pem_file().is_none());
        assert!(settings.cert_digest_hex().is_none());
        assert!(
            settings
                .gateway_control_url()
                .expect("no URL is valid")
                .is_none()
        );
        assert_eq!(settings.publish_timeout(), Duration::from_secs(3));
        assert_eq!(settings.welcome_message(), DEFAULT_WELCOME_MESSAGE);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("RELAY_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            ("RELAY_CERT_PEM_FILE", Some("/etc/gateway/cert.pem".to_owned())),
            ("RELAY_CERT_DIGEST_HEX", None),
            (
                "RELAY_GATEWAY_CONTROL_URL",
                Some("http://gateway:8081/".to_owned()),
            ),
            ("RELAY_PUBLISH_TIMEOUT_MS", Some("1500".to_owned())),
            ("RELAY_WELCOME_MESSAGE", Some("hello".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("valid address"),
            "127.0.0.1:9090".parse::<SocketAddr>().expect("valid")
        );
        assert_eq!(
            settings.cert_pem_file(),
            Some(Path::new("/etc/gateway/cert.pem"))
        );
        assert_eq!(
            settings
                .gateway_control_url()
                .expect("valid URL")
                .map(String::from),
            Some("http://gateway:8081/".to_owned())
        );
        assert_eq!(settings.publish_timeout(), Duration::from_millis(1500));
        assert_eq!(settings.welcome_message(), "hello");
    }

    #[rstest]
    #[case("localhost")]
    #[case("0.0.0.0")]
    #[case("")]
    fn malformed_bind_addr_is_reported(#[case] value: &str) {
        let settings = RelaySettings {
            bind_addr: Some(value.to_owned()),
            ..RelaySettings::default()
        };
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
    }

    #[rstest]
    #[case("not a url")]
    #[case("/internal")]
    fn relative_control_url_is_reported(#[case] value: &str) {
        let settings = RelaySettings {
            gateway_control_url: Some(value.to_owned()),
            ..RelaySettings::default()
        };
        assert!(matches!(
            settings.gateway_control_url(),
            Err(SettingsError::ControlUrl { .. })
        ));
    }
}
