//! Best-effort removal of temporary job files.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

/// A temporary file that could not be removed. Logged, never escalated.
#[derive(Debug, Error)]
#[error("failed to remove {}: {source}", path.display())]
pub struct CleanupWarning {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Returns `Ok(true)` if a file was removed and `Ok(false)` if none existed.
pub async fn remove_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Attempts every path; a failure on one never stops the others.
pub async fn sweep<'a, I>(paths: I) -> Vec<CleanupWarning>
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut warnings = Vec::new();

    for path in paths {
        match remove_if_exists(path).await {
            Ok(true) => debug!("Cleaned up: {}", path.display()),
            Ok(false) => {}
            Err(source) => {
                let warning = CleanupWarning {
                    path: path.to_path_buf(),
                    source,
                };
                warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }

    warnings
}
