//! The durable shared data file accumulating received lines

use crate::Result;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWrite, AsyncWriteExt, SeekFrom};

/// Chunk size used when streaming the store back to a client.
const REPLY_CHUNK: usize = 512;

/// The single durable file shared by every session of one server process.
///
/// Opened once before the listener starts accepting and removed exactly once
/// during teardown. Appends only ever add whole newline-terminated lines;
/// reads always start from offset zero.
pub struct LogStore {
    path: PathBuf,
    file: File,
    len: u64,
}

impl LogStore {
    /// Open the store at `path`, creating the file if it does not exist.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)
            .await?;
        let len = file.metadata().await?.len();
        Ok(Self { path, file, len })
    }

    /// Append one complete newline-terminated line and flush it to the
    /// storage layer before returning, so a reply phase that follows
    /// immediately reads the line back.
    pub async fn append_line(&mut self, line: &[u8]) -> Result<()> {
        self.file.write_all(line).await?;
        self.file.flush().await?;
        self.len += line.len() as u64;
        Ok(())
    }

    /// Stream the entire current content, from offset zero, into `writer`.
    ///
    /// Short writes are resumed by `write_all`; the transfer either delivers
    /// every byte in order or fails with the writer's error. Returns the
    /// number of bytes sent.
    pub async fn stream_to<W>(&mut self, writer: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        self.file.seek(SeekFrom::Start(0)).await?;

        let mut chunk = [0u8; REPLY_CHUNK];
        let mut sent: u64 = 0;
        loop {
            let n = self.file.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            writer.write_all(&chunk[..n]).await?;
            sent += n as u64;
        }
        writer.flush().await?;
        Ok(sent)
    }

    /// Total bytes accumulated so far
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether any line has been stored yet
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the handle and delete the backing file.
    pub async fn remove(self) -> Result<()> {
        let path = self.path;
        drop(self.file);
        tokio::fs::remove_file(&path).await?;
        Ok(())
    }
}
