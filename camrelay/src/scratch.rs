//! Per-request scratch image files.
//!
//! Each inbound submission owns exactly one [`ScratchImage`]: a uniquely named file written
//! immediately before the outbound Telegram call and removed when the guard drops, on every
//! exit path. Names are uuid-v4 based, so concurrent requests sharing the scratch directory
//! cannot collide.

use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

/// RAII guard over a temporary image file.
///
/// Removal is best-effort: a failed delete is logged at warn level and never surfaced
/// to the caller.
#[derive(Debug)]
pub struct ScratchImage {
    path: PathBuf,
}

impl ScratchImage {
    /// Write `bytes` to a freshly named `.jpg` file under `dir`.
    ///
    /// A failed write may still leave a partial file (e.g. on a full disk); that
    /// file is removed before the error is returned.
    pub async fn write(dir: &Path, bytes: &[u8]) -> std::io::Result<Self> {
        let path = dir.join(format!("{}.jpg", Uuid::new_v4()));
        if let Err(e) = tokio::fs::write(&path, bytes).await {
            let _ = std::fs::remove_file(&path);
            return Err(e);
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchImage {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "Failed to delete scratch image");
        }
    }
}
