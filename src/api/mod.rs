//! Remote media source: the capability the download coordinator drives,
//! and the yt-dlp backed implementation of it.

pub mod client;
pub mod models;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::domain::RemoteVideoInfo;

pub use client::{ApiError, Result, YtDlpClient};
pub use models::{FetchOptions, SourceConfig, SubtitleOptions};

pub type ByteStream = BoxStream<'static, Result<Bytes>>;

#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Metadata for the watch URL. An `ApiError::Remote` here is the remote
    /// error event the coordinator classifies.
    async fn fetch_info(&self, url: &str, options: &FetchOptions) -> Result<RemoteVideoInfo>;

    /// Binary body of the video described by `info`.
    async fn open_stream(&self, info: &RemoteVideoInfo) -> Result<ByteStream>;

    /// Writes subtitle tracks into `options.destination` and returns the
    /// names of the files written.
    async fn fetch_subtitles(&self, url: &str, options: &SubtitleOptions) -> Result<Vec<String>>;
}
