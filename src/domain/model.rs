use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::utils::sanitize_filename;

use super::AppError;

/// One media item to fetch. Immutable for the duration of a download.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub video_id: String,
    pub output_dir: PathBuf,
    pub filename_prefix: String,
    pub title: String,
    pub quality_format: String,
    /// Passed through to the remote source as its verbose switch.
    pub verbose: bool,
}

impl DownloadRequest {
    pub fn new(
        video_id: impl Into<String>,
        output_dir: impl Into<PathBuf>,
        filename_prefix: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            video_id: video_id.into(),
            output_dir: output_dir.into(),
            filename_prefix: filename_prefix.into(),
            title: title.into(),
            quality_format: DEFAULT_QUALITY_FORMAT.to_string(),
            verbose: false,
        }
    }

    pub fn with_quality_format(mut self, quality_format: impl Into<String>) -> Self {
        self.quality_format = quality_format.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn naming(&self) -> DerivedNaming {
        DerivedNaming::derive(self)
    }
}

pub const DEFAULT_QUALITY_FORMAT: &str = "best[ext=mp4]/best";

/// File names derived from a request.
///
/// `base_name` is `"{prefix}. {sanitized title}-{video id}"`; the video is
/// staged under a dot-prefixed name in the same directory so the rename
/// into place never crosses a filesystem boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedNaming {
    pub base_name: String,
    pub final_video_path: PathBuf,
    pub temp_video_path: PathBuf,
}

impl DerivedNaming {
    pub fn derive(request: &DownloadRequest) -> Self {
        let base_name = format!(
            "{}. {}-{}",
            request.filename_prefix,
            sanitize_filename(&request.title),
            request.video_id
        );
        let final_video_path = request.output_dir.join(format!("{}.mp4", base_name));
        let temp_video_path = request.output_dir.join(format!(".{}.mp4", base_name));

        Self {
            base_name,
            final_video_path,
            temp_video_path,
        }
    }

    pub fn final_file_name(&self) -> String {
        file_name_of(&self.final_video_path)
    }

    pub fn subtitle_path(&self, dir: &Path, suffix: &str) -> PathBuf {
        dir.join(format!("{}{}", self.base_name, suffix))
    }
}

/// What the remote source reports before the transfer starts.
#[derive(Debug, Clone, Default)]
pub struct RemoteVideoInfo {
    pub size_bytes: u64,
    pub stream_url: String,
    pub http_headers: HashMap<String, String>,
}

/// A subtitle file written by the remote source under its own name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleFile {
    pub remote_path: PathBuf,
    pub language_extension: Option<String>,
}

#[derive(Debug)]
pub enum DownloadOutcome {
    /// Nothing to do: empty id or a permanently unavailable video.
    Skipped,
    /// File name (not path) of the committed video.
    Completed(String),
    Failed(AppError),
}

impl DownloadOutcome {
    /// File name carried by the outcome; empty for anything but `Completed`.
    pub fn file_name(&self) -> &str {
        match self {
            DownloadOutcome::Completed(name) => name,
            _ => "",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, DownloadOutcome::Failed(_))
    }

    pub fn into_result(self) -> Result<Option<String>, AppError> {
        match self {
            DownloadOutcome::Skipped => Ok(None),
            DownloadOutcome::Completed(name) => Ok(Some(name)),
            DownloadOutcome::Failed(e) => Err(e),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadPhase {
    FetchingInfo,
    Transferring,
    Committing,
    FetchingSubtitles,
    Completed,
    Skipped,
    Failed,
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
