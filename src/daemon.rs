//! Detaching the process from its controlling terminal

use crate::{LineLogError, Result};
use nix::unistd::{fork, setsid, ForkResult};

/// Detach from the controlling terminal: fork, exit the parent with status
/// zero, and start a new session in the child.
///
/// Must be called after the listening socket is bound, so the parent reports
/// a bind failure synchronously, and before the tokio runtime is built, since
/// runtime threads do not survive a fork.
pub fn detach() -> Result<()> {
    // Safety: the process is single-threaded at this point; the runtime and
    // any worker threads are created only after detaching.
    match unsafe { fork() }
        .map_err(|e| LineLogError::Server(format!("Failed to fork: {}", e)))?
    {
        ForkResult::Parent { .. } => std::process::exit(0),
        ForkResult::Child => {
            setsid().map_err(|e| {
                LineLogError::Server(format!("Failed to create new session: {}", e))
            })?;
            Ok(())
        }
    }
}
