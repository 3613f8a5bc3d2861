//! Downloads a single video and its subtitle tracks to a local directory.
//!
//! The video is streamed into a hidden temp file and renamed into place only
//! once the transfer has finished, so the final name never refers to a
//! partial file. Re-running a download whose final file already exists is a
//! no-op.
//!
//! ```no_run
//! use simple_video_downloader::{DownloadCoordinator, DownloadRequest, SourceConfig};
//!
//! # async fn run() -> Result<(), simple_video_downloader::AppError> {
//! let coordinator = DownloadCoordinator::from_config(SourceConfig::default());
//! let request = DownloadRequest::new("dQw4w9WgXcQ", "videos", "01", "Never Gonna Give You Up");
//! if let Some(name) = coordinator.download(&request).await.into_result()? {
//!     println!("saved {}", name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod application;
pub mod domain;
pub mod storage;
pub mod ui;
pub mod utils;

pub use api::{MediaSource, SourceConfig, YtDlpClient};
pub use application::DownloadCoordinator;
pub use domain::{AppError, DownloadOutcome, DownloadRequest};
