//! Startup configuration.
//!
//! The process runs in exactly one mode, chosen once from command-line input before any
//! channel code runs. Library code takes the resolved [`RunMode`] and never inspects
//! process arguments itself.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::{Error, Result};

/// Default bind address for server mode (all interfaces, like `:port`).
pub const DEFAULT_BIND_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Default host the client dials.
pub const DEFAULT_CLIENT_HOST: &str = "localhost";

const USAGE: &str = "usage: boxwire -l <port> | boxwire <port> <message>";

/// Resolved process mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Serve the secure echo protocol on `listen` until the process is stopped.
    Server { listen: SocketAddr },
    /// Dial `server`, send `message` once, print the echoed reply.
    Client { server: String, message: String },
}

impl RunMode {
    /// Resolve the run mode from raw command-line values.
    ///
    /// A non-zero `listen_port` selects server mode and ignores the positional values.
    /// Otherwise both `port` and `message` are required.
    pub fn resolve(
        listen_port: Option<u16>,
        bind_host: IpAddr,
        client_host: &str,
        port: Option<u16>,
        message: Option<String>,
    ) -> Result<Self> {
        if let Some(listen_port) = listen_port.filter(|p| *p != 0) {
            return Ok(Self::Server {
                listen: SocketAddr::new(bind_host, listen_port),
            });
        }

        match (port, message) {
            (Some(0), _) => Err(Error::config("port must be non-zero")),
            (Some(port), Some(message)) => {
                if client_host.trim().is_empty() {
                    return Err(Error::config("client host must not be empty"));
                }
                Ok(Self::Client {
                    server: format!("{}:{}", client_host, port),
                    message,
                })
            }
            _ => Err(Error::config(USAGE)),
        }
    }
}
