//! Server configuration read from the environment

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 5000;

/// Upload limit for request bodies (64 MiB).
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Read `PORT` once. A missing variable gives the default port; an
    /// unparseable one is logged and also falls back to the default.
    pub fn from_env() -> Self {
        Self::from_port_var(std::env::var("PORT").ok().as_deref())
    }

    pub fn from_port_var(port: Option<&str>) -> Self {
        let port = match port {
            None => DEFAULT_PORT,
            Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|e| {
                warn!("Invalid PORT value '{raw}': {e}, using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
        };

        Self {
            port,
            ..Self::default()
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
