//! Persistence layer.
//!
//! Two kinds of JSON documents live on disk: one pool snapshot per game
//! (`snapshot`) and one history entry per generation (`history`). Both
//! default to a per-user application data directory.

pub mod history;
pub mod snapshot;

use std::path::PathBuf;

pub use history::{HistoryEntry, HistoryMeta, HistoryStore};
pub use snapshot::SnapshotCache;

/// Directory name under the platform data directory.
pub const APP_DIR_NAME: &str = "MegaSurpresinhas";

/// `~/.local/share/MegaSurpresinhas` on Linux, `%LOCALAPPDATA%` on Windows.
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::data_dir)
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR_NAME))
}

/// Where history documents go unless configured otherwise: next to the
/// snapshots, under `historico/`.
pub fn default_history_dir() -> PathBuf {
    default_data_dir().join("historico")
}
