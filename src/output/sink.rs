//! File sink implementation

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Accepts a named JSON document and stores it durably
#[async_trait]
pub trait PersistenceSink: Send + Sync {
    /// Store `value` under `name`, returning where it went
    async fn write(&self, name: &str, value: &Value) -> Result<PathBuf>;
}

/// Writes each document to `<dir>/<name>`
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    /// Create a sink writing pretty-printed JSON into `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn target(&self, name: &str) -> Result<PathBuf> {
        let file = Path::new(name);
        let is_plain_name = file.file_name().is_some_and(|f| f == file.as_os_str());
        if name.is_empty() || !is_plain_name {
            return Err(Error::output(format!("Invalid output file name: '{name}'")));
        }
        Ok(self.dir.join(file))
    }
}

#[async_trait]
impl PersistenceSink for JsonFileSink {
    async fn write(&self, name: &str, value: &Value) -> Result<PathBuf> {
        let path = self.target(name)?;

        let contents = serde_json::to_vec_pretty(value)?;

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            Error::output(format!(
                "Failed to create output directory {}: {e}",
                self.dir.display()
            ))
        })?;

        // Write to temp file first, then rename into place
        let temp_path = self.dir.join(format!(".{name}.tmp"));
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::output(format!("Failed to write {}: {e}", temp_path.display())))?;

        if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&temp_path).await {
                warn!("Failed to remove {}: {cleanup}", temp_path.display());
            }
            return Err(Error::output(format!(
                "Failed to rename into {}: {e}",
                path.display()
            )));
        }

        info!("Data saved to {}", path.display());
        Ok(path)
    }
}
