//! LineLog server implementation

pub mod session;
pub mod store;
pub mod tcp;

use crate::config::ServerConfig;
use crate::{LineLogError, Result};
use std::net::SocketAddr;
use tokio::net::TcpSocket;
use tokio::sync::broadcast;
use tracing::info;

pub use session::Session;
pub use store::LogStore;
pub use tcp::TcpServer;

/// The process lifecycle controller.
///
/// Owns the listening socket and the [`LogStore`], runs the accept loop, and
/// performs the ordered teardown: close the listener, close the store handle,
/// remove the store file. Teardown is idempotent; the signal path only
/// resolves the accept/signal race, the main flow does the actual release.
pub struct LineLogServer {
    config: ServerConfig,
    listener: Option<TcpServer>,
    store: Option<LogStore>,
    shutdown_tx: broadcast::Sender<()>,
}

impl LineLogServer {
    /// Open the store and bind the listener. Any failure here is fatal.
    pub async fn bind(config: ServerConfig) -> Result<Self> {
        let socket = TcpServer::bind_socket(&config)?;
        Self::with_socket(socket, config).await
    }

    /// Like [`LineLogServer::bind`], but on an already-bound socket. This is
    /// the entry point for daemon mode, where the socket is bound before the
    /// process forks and the runtime is built.
    ///
    /// The store is opened before the listener starts, so the data file
    /// exists before the first connection can be accepted.
    pub async fn with_socket(socket: TcpSocket, config: ServerConfig) -> Result<Self> {
        config.validate()?;

        let store = LogStore::open(&config.storage.data_file).await?;
        info!(path = %store.path().display(), "data file opened");

        let listener = TcpServer::listen(socket, &config)?;
        info!(addr = %listener.local_addr()?, "listening");

        let (shutdown_tx, _) = broadcast::channel(1);
        Ok(Self {
            config,
            listener: Some(listener),
            store: Some(store),
            shutdown_tx,
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        match &self.listener {
            Some(listener) => listener.local_addr(),
            None => Err(LineLogError::Server(
                "listener already shut down".to_string(),
            )),
        }
    }

    /// Handle that requests shutdown from another task
    pub fn shutdown_handle(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Serve until a termination signal (SIGINT/SIGTERM), a shutdown request,
    /// or a fatal accept failure, then tear down.
    pub async fn run(mut self) -> Result<()> {
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let outcome = match (&mut self.listener, &mut self.store) {
            (Some(listener), Some(store)) => {
                tokio::select! {
                    res = listener.run(store) => res,
                    res = termination_signal() => match res {
                        Ok(()) => {
                            info!("caught signal, exiting");
                            Ok(())
                        }
                        Err(e) => Err(LineLogError::Io(e)),
                    },
                    _ = shutdown_rx.recv() => {
                        info!("shutdown requested");
                        Ok(())
                    }
                }
            }
            _ => Err(LineLogError::Server("server already shut down".to_string())),
        };

        // Cancelling the accept loop above dropped any in-flight session and
        // with it the client connection; what is left is the listener and
        // the store.
        let teardown = self.shutdown().await;
        outcome.and(teardown)
    }

    /// Ordered teardown: close the listening socket, then close and remove
    /// the data file. Safe to invoke more than once; later calls are no-ops.
    pub async fn shutdown(&mut self) -> Result<()> {
        if let Some(listener) = self.listener.take() {
            drop(listener);
            info!("listening socket closed");
        }
        if let Some(store) = self.store.take() {
            let path = self.config.storage.data_file.clone();
            store.remove().await?;
            info!(path = %path.display(), "data file removed");
        }
        Ok(())
    }
}

/// Resolves when SIGINT or SIGTERM is delivered.
async fn termination_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        _ = interrupt.recv() => {}
        _ = terminate.recv() => {}
    }
    Ok(())
}
