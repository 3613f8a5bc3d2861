pub mod classify;
pub mod error;
pub mod model;

pub use classify::{classify, Disposition};
pub use error::AppError;
pub use model::{
    DerivedNaming, DownloadOutcome, DownloadPhase, DownloadRequest, RemoteVideoInfo, SubtitleFile,
    DEFAULT_QUALITY_FORMAT,
};
