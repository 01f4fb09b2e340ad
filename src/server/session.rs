//! Per-connection receive/reply state machine

use crate::config::{OverflowPolicy, ServerConfig};
use crate::server::LogStore;
use crate::Result;
use bytes::{BufMut, BytesMut};
use std::net::SocketAddr;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tracing::{debug, warn};

/// One client's interaction with the server: the connection, its peer
/// address, and a transient receive buffer.
///
/// A session cycles `RECEIVING -> REPLYING -> RECEIVING` for every
/// newline-terminated line until the peer disconnects or an I/O error ends
/// it. Sessions run strictly one at a time, so each borrows the process-wide
/// [`LogStore`] exclusively for its whole lifetime.
pub struct Session {
    stream: TcpStream,
    peer: SocketAddr,
    buf: BytesMut,
    capacity: usize,
    policy: OverflowPolicy,
}

impl Session {
    /// Wrap an accepted connection
    pub fn new(stream: TcpStream, peer: SocketAddr, config: &ServerConfig) -> Self {
        let capacity = config.server.buffer_size;
        Self {
            stream,
            peer,
            buf: BytesMut::with_capacity(capacity),
            capacity,
            policy: config.server.overflow_policy,
        }
    }

    /// Address of the connected peer
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Drain the connection: append every completed line to `store` and
    /// stream the full accumulated content back after each one.
    ///
    /// Returns `Ok(())` on peer disconnect. Any receive, send, or store
    /// error ends this session only; the caller decides whether to keep
    /// accepting.
    pub async fn run(mut self, store: &mut LogStore) -> Result<()> {
        loop {
            let n = match self.policy {
                OverflowPolicy::Discard => {
                    let room = self.capacity - self.buf.len();
                    self.stream.read_buf(&mut (&mut self.buf).limit(room)).await?
                }
                OverflowPolicy::Grow => self.stream.read_buf(&mut self.buf).await?,
            };
            if n == 0 {
                // Peer closed; any unterminated tail is dropped, never stored.
                break;
            }
            debug!(peer = %self.peer, bytes = n, "received data");

            while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
                let line = self.buf.split_to(pos + 1);
                store.append_line(&line).await?;
                let sent = store.stream_to(&mut self.stream).await?;
                debug!(peer = %self.peer, line_len = line.len(), reply_len = sent, "line stored, replied");
            }

            if self.policy == OverflowPolicy::Discard && self.buf.len() == self.capacity {
                warn!(
                    peer = %self.peer,
                    capacity = self.capacity,
                    "line exceeds receive buffer with no terminator, discarding"
                );
                self.buf.clear();
            }
        }
        Ok(())
    }
}
