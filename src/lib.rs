pub mod app;
pub mod domain;
pub mod error;
pub mod infra;

use std::path::PathBuf;

/// Default on-disk location of the booking database.
pub fn default_db_path() -> PathBuf {
    let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("gigbook").join("gigbook.db")
}
