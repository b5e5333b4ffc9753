//! HTTP server configuration.
//!
//! - `HOST` / `PORT`: Bind address (default: `0.0.0.0:3000`)
//! - `SESSION_IDLE_TTL_SECS`: Editing sessions untouched this long are evicted
//!   (default: 3600)

use std::net::SocketAddr;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub session_idle_ttl: Duration,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_source(crate::env_var)
    }

    pub fn from_source(get: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: get("HOST")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            port: get("PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(3000),
            session_idle_ttl: Duration::from_secs(
                get("SESSION_IDLE_TTL_SECS")
                    .and_then(|v| v.trim().parse().ok())
                    .filter(|secs| *secs > 0)
                    .unwrap_or(3600),
            ),
        }
    }

    /// `host:port`, suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The bind address as a socket address, when the host is an IP literal.
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.bind_address().parse().ok()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_source(|_| None)
    }
}
