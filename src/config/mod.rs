//! Configuration handling for LineLog

mod settings;

pub use settings::{OverflowPolicy, ServerConfig, ServerSettings, StorageSettings};
