use async_trait::async_trait;
use service_core::error::AppError;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Destination for uploaded files.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Directory (or prefix) that stored files land in.
    fn destination(&self) -> &Path;

    /// Stores `data` under `name` and returns the full stored path.
    async fn upload(&self, name: &str, data: &[u8]) -> Result<PathBuf, std::io::Error>;

    /// Removes a previously stored file; a missing file is not an error.
    async fn delete(&self, name: &str) -> Result<(), std::io::Error>;
}

pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Creates `base_path` (with parents) if it does not exist yet.
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).await?;
        }
        Ok(Self { base_path })
    }
}

#[async_trait]
impl Storage for LocalStorage {
    fn destination(&self) -> &Path {
        &self.base_path
    }

    async fn upload(&self, name: &str, data: &[u8]) -> Result<PathBuf, std::io::Error> {
        let path = self.base_path.join(name);
        fs::write(&path, data).await?;
        Ok(path)
    }

    async fn delete(&self, name: &str) -> Result<(), std::io::Error> {
        match fs::remove_file(self.base_path.join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
