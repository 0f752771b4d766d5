//! Server settings for config-vault
//!
//! [`ServerSettings`] holds everything the HTTP listener needs. It is built
//! once at startup from command-line flags and environment variables, then
//! handed to [`crate::api::serve`].

use std::net::{IpAddr, SocketAddr};

use crate::error::VaultError;

/// Environment variable selecting the listening port
pub const PORT_ENV: &str = "PORT";

/// Port used when neither `--port` nor `PORT` is given
pub const DEFAULT_PORT: u16 = 3000;

/// Interface bound when none is given
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Listener settings for the HTTP server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Interface address to bind
    pub bind: String,
    /// TCP port to listen on (0 picks an ephemeral port)
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerSettings {
    /// Create settings for a given interface and port
    pub fn new(bind: impl Into<String>, port: u16) -> Self {
        Self {
            bind: bind.into(),
            port,
        }
    }

    /// Parse the socket address to listen on
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Config`] if `bind` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, VaultError> {
        let ip: IpAddr = self.bind.parse().map_err(|e| {
            VaultError::Config(format!("Invalid bind address '{}': {}", self.bind, e))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ServerSettings::default();
        assert_eq!(settings.port, 3000);
        assert_eq!(settings.bind, "0.0.0.0");
    }

    #[test]
    fn test_socket_addr() {
        let settings = ServerSettings::new("127.0.0.1", 8080);
        let addr = settings.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_ipv6_socket_addr() {
        let addr = ServerSettings::new("::", 3000).socket_addr().unwrap();
        assert!(addr.is_ipv6());
        assert_eq!(addr.to_string(), "[::]:3000");

        let addr = ServerSettings::new("::1", 8080).socket_addr().unwrap();
        assert_eq!(addr.to_string(), "[::1]:8080");
    }

    #[test]
    fn test_invalid_bind_returns_error() {
        let settings = ServerSettings::new("not.an.ip", 8080);
        let err = settings.socket_addr().unwrap_err();
        assert!(matches!(err, VaultError::Config(_)));
    }
}
