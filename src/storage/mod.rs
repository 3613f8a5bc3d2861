//! Filesystem access used by the download coordinator.

use std::io;
use std::path::Path;

use async_trait::async_trait;
use tokio::io::AsyncWrite;

pub type FileSink = Box<dyn AsyncWrite + Send + Unpin>;

#[async_trait]
pub trait Filesystem: Send + Sync {
    async fn exists(&self, path: &Path) -> bool;

    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Creates or truncates `path` for writing.
    async fn create(&self, path: &Path) -> io::Result<FileSink>;
}

/// Local disk through `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

#[async_trait]
impl Filesystem for LocalFs {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        tokio::fs::rename(from, to).await
    }

    async fn create(&self, path: &Path) -> io::Result<FileSink> {
        let file = tokio::fs::File::create(path).await?;
        Ok(Box::new(file))
    }
}
