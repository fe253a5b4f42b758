//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` so binary crates prepare storage paths
//! through `service::runtime` without depending directly on `common`.

use configs::{AppConfig, StorageKind};

/// Ensure the directory holding the file engine's data exists.
pub async fn ensure_env(cfg: &AppConfig) -> anyhow::Result<()> {
    if cfg.storage.kind == StorageKind::File {
        common::env::ensure_parent_dir(std::path::Path::new(&cfg.storage.file_path)).await?;
    }
    Ok(())
}
