//! TCP listener and serial accept loop

use crate::config::ServerConfig;
use crate::server::{LogStore, Session};
use crate::{LineLogError, Result};
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpSocket};
use tracing::{error, info};

/// Listen backlog for pending connections.
const BACKLOG: u32 = 5;

/// The listening socket and its accept loop.
///
/// Connections are handled strictly one at a time: a session runs to
/// completion before the next accept. An accept failure is fatal and returned
/// to the caller, which moves the service into shutdown.
pub struct TcpServer {
    listener: TcpListener,
    config: ServerConfig,
}

impl TcpServer {
    /// Create and bind the listening socket with address reuse enabled.
    ///
    /// Runtime-free, so the binary can bind (and report bind failures to the
    /// invoking shell) before daemonizing and before the tokio runtime is
    /// built. Pair with [`TcpServer::listen`] once inside the runtime.
    pub fn bind_socket(config: &ServerConfig) -> Result<TcpSocket> {
        let addr: SocketAddr = config.listen_addr().parse().map_err(|e| {
            LineLogError::Config(format!(
                "Invalid listen address {}: {}",
                config.listen_addr(),
                e
            ))
        })?;
        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.set_reuseaddr(true)?;
        socket
            .bind(addr)
            .map_err(|e| LineLogError::Server(format!("Failed to bind {}: {}", addr, e)))?;
        Ok(socket)
    }

    /// Start listening on an already-bound socket. Must be called from within
    /// a tokio runtime.
    pub fn listen(socket: TcpSocket, config: &ServerConfig) -> Result<Self> {
        let listener = socket
            .listen(BACKLOG)
            .map_err(|e| LineLogError::Server(format!("Failed to listen: {}", e)))?;
        Ok(Self {
            listener,
            config: config.clone(),
        })
    }

    /// Bind and listen in one step
    pub fn bind(config: &ServerConfig) -> Result<Self> {
        let socket = Self::bind_socket(config)?;
        Self::listen(socket, config)
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept and serve connections serially until an accept failure.
    pub async fn run(&mut self, store: &mut LogStore) -> Result<()> {
        loop {
            let (stream, peer) = self.listener.accept().await.map_err(|e| {
                LineLogError::Server(format!("Failed to accept connection: {}", e))
            })?;
            info!(peer = %peer, "accepted connection");

            let session = Session::new(stream, peer, &self.config);
            if let Err(e) = session.run(store).await {
                // Session-local failure: this connection is lost, the
                // service keeps accepting.
                error!(peer = %peer, error = %e, "session aborted");
            }
            info!(peer = %peer, "closed connection");
        }
    }
}
