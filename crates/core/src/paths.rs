//! Centralized path functions for all app storage locations.

use std::path::PathBuf;

/// App cache root: `~/Library/Caches/copilot-dash/` (macOS) or `~/.cache/copilot-dash/` (Linux).
pub fn app_cache_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("copilot-dash"))
}

/// SQLite database file: `<app_cache_dir>/copilot-dash.db`.
pub fn db_path() -> Option<PathBuf> {
    app_cache_dir().map(|d| d.join("copilot-dash.db"))
}
