//! # LineLog - Accumulating Line-Echo TCP Service
//!
//! LineLog is a single-process TCP service that appends each newline-terminated
//! line it receives to a durable shared log file, and after every completed line
//! replies to the client with the entire accumulated file content.
//!
//! ## Features
//!
//! - **Newline framing**: raw bytes in, `\n` as the only delimiter
//! - **Durable accumulation**: one append-only data file shared across connections
//! - **Serial sessions**: one connection fully drained before the next is accepted
//! - **Daemon mode**: optional fork/setsid detach at startup
//! - **Graceful shutdown**: SIGINT/SIGTERM trigger ordered teardown that removes
//!   the data file and releases the socket
//!
//! ## Quick Start
//!
//! ```no_run
//! use linelog::config::ServerConfig;
//! use linelog::server::LineLogServer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     let server = LineLogServer::bind(config).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod daemon;
pub mod server;

/// Common error types used throughout LineLog
pub mod error {
    use std::fmt;

    /// LineLog error types
    #[derive(Debug)]
    pub enum LineLogError {
        /// I/O operation failed
        Io(std::io::Error),
        /// Configuration error
        Config(String),
        /// Server error
        Server(String),
        /// Connection error
        Connection(String),
    }

    impl fmt::Display for LineLogError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                LineLogError::Io(e) => write!(f, "I/O error: {}", e),
                LineLogError::Config(e) => write!(f, "Configuration error: {}", e),
                LineLogError::Server(e) => write!(f, "Server error: {}", e),
                LineLogError::Connection(e) => write!(f, "Connection error: {}", e),
            }
        }
    }

    impl std::error::Error for LineLogError {}

    impl From<std::io::Error> for LineLogError {
        fn from(err: std::io::Error) -> Self {
            LineLogError::Io(err)
        }
    }

    /// Result type alias for LineLog operations
    pub type Result<T> = std::result::Result<T, LineLogError>;
}

pub use error::{LineLogError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{OverflowPolicy, ServerConfig};
    pub use crate::server::{LineLogServer, LogStore};
    pub use crate::{LineLogError, Result};
}
