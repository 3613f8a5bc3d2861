use std::path::Path;
use std::sync::Arc;

use futures::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::{
    api::{FetchOptions, MediaSource, SourceConfig, SubtitleOptions, YtDlpClient},
    domain::{
        classify, AppError, DerivedNaming, Disposition, DownloadOutcome, DownloadPhase,
        DownloadRequest, RemoteVideoInfo, SubtitleFile,
    },
    storage::{Filesystem, LocalFs},
    ui::{ProgressReporter, TerminalProgress, TransferBar},
    utils::{subtitle_suffix, watch_url},
};

/// Drives one media item from metadata to committed file plus subtitles.
///
/// Two calls whose requests derive the same paths must not run at the same
/// time; calls for different items need no coordination.
#[derive(Clone)]
pub struct DownloadCoordinator {
    source: Arc<dyn MediaSource>,
    fs: Arc<dyn Filesystem>,
    progress: Arc<dyn ProgressReporter>,
    watch_url_base: String,
    subtitle_language: String,
}

/// Bytes sitting in the temp file, waiting to be committed.
struct Staged {
    bytes: u64,
    bar: Box<dyn TransferBar>,
}

impl DownloadCoordinator {
    pub fn new(source: Arc<dyn MediaSource>) -> Self {
        let defaults = SourceConfig::default();
        Self {
            source,
            fs: Arc::new(LocalFs),
            progress: Arc::new(TerminalProgress::new()),
            watch_url_base: defaults.watch_url_base,
            subtitle_language: defaults.subtitle_language,
        }
    }

    /// Coordinator backed by yt-dlp and the local disk.
    pub fn from_config(config: SourceConfig) -> Self {
        let watch_url_base = config.watch_url_base.clone();
        let subtitle_language = config.subtitle_language.clone();
        Self {
            watch_url_base,
            subtitle_language,
            ..Self::new(Arc::new(YtDlpClient::new(config)))
        }
    }

    pub fn with_filesystem(mut self, fs: Arc<dyn Filesystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Downloads the video and its subtitles. Always resolves to exactly one
    /// outcome; fatal errors come back unmodified inside `Failed`.
    pub async fn download(&self, request: &DownloadRequest) -> DownloadOutcome {
        if request.video_id.is_empty() {
            return DownloadOutcome::Skipped;
        }

        let naming = request.naming();
        let final_name = naming.final_file_name();

        if self.fs.exists(&naming.final_video_path).await {
            tracing::info!(
                video_id = %request.video_id,
                file = %final_name,
                "Already downloaded, skipping"
            );
            return DownloadOutcome::Completed(final_name);
        }

        let url = watch_url(&self.watch_url_base, &request.video_id);

        enter(request, DownloadPhase::FetchingInfo);
        let info = match self.fetch_info(&url, request).await {
            Ok(info) => info,
            Err(outcome) => return outcome,
        };

        enter(request, DownloadPhase::Transferring);
        let staged = match self.transfer(&info, &naming).await {
            Ok(staged) => staged,
            Err(e) => return fail(request, e),
        };

        enter(request, DownloadPhase::Committing);
        // Subtitles are not attempted when the commit fails.
        if let Err(e) = self.commit(&naming, staged).await {
            return fail(request, e);
        }
        tracing::info!(video_id = %request.video_id, file = %final_name, "Download complete");

        enter(request, DownloadPhase::FetchingSubtitles);
        self.acquire_subtitles(&url, request, &naming).await;

        enter(request, DownloadPhase::Completed);
        DownloadOutcome::Completed(final_name)
    }

    /// Errors here are the only ones run through the classification table.
    async fn fetch_info(
        &self,
        url: &str,
        request: &DownloadRequest,
    ) -> Result<RemoteVideoInfo, DownloadOutcome> {
        let spinner = self.progress.spinner(&format!("Fetching info for {}", request.video_id));
        let options = FetchOptions {
            quality_format: request.quality_format.clone(),
            verbose: request.verbose,
        };

        match self.source.fetch_info(url, &options).await {
            Ok(info) => {
                spinner.succeed(&format!("Got info for {}", request.video_id));
                Ok(info)
            }
            Err(e) => {
                spinner.fail(&format!("Could not fetch info for {}", request.video_id));
                let error = AppError::from(e);
                match classify(error.remote_message()) {
                    Disposition::Skip => {
                        tracing::error!(
                            video_id = %request.video_id,
                            error = %error,
                            "Video not available, skipping"
                        );
                        enter(request, DownloadPhase::Skipped);
                        Err(DownloadOutcome::Skipped)
                    }
                    Disposition::Propagate => Err(fail(request, error)),
                }
            }
        }
    }

    /// Streams the body into the temp path. The final path is never written.
    async fn transfer(
        &self,
        info: &RemoteVideoInfo,
        naming: &DerivedNaming,
    ) -> Result<Staged, AppError> {
        let temp = &naming.temp_video_path;
        let mut stream = self.source.open_stream(info).await?;
        let mut sink = self
            .fs
            .create(temp)
            .await
            .map_err(|e| AppError::io(temp, e))?;

        let bar = self.progress.transfer(info.size_bytes);
        let mut downloaded = 0u64;

        while let Some(chunk) = stream.next().await {
            let written = match chunk {
                Ok(chunk) => sink
                    .write_all(&chunk)
                    .await
                    .map(|_| chunk.len() as u64)
                    .map_err(|e| AppError::io(temp, e)),
                Err(e) => Err(AppError::from(e)),
            };
            match written {
                Ok(n) => {
                    downloaded += n;
                    bar.update(downloaded);
                }
                Err(e) => {
                    bar.stop();
                    return Err(e);
                }
            }
        }

        if let Err(e) = sink.shutdown().await {
            bar.stop();
            return Err(AppError::io(temp, e));
        }

        Ok(Staged {
            bytes: downloaded,
            bar,
        })
    }

    async fn commit(&self, naming: &DerivedNaming, staged: Staged) -> Result<(), AppError> {
        let result = self
            .fs
            .rename(&naming.temp_video_path, &naming.final_video_path)
            .await;

        match result {
            Ok(()) => staged.bar.finish(staged.bytes),
            Err(_) => staged.bar.stop(),
        }

        result.map_err(|source| AppError::Commit {
            from: naming.temp_video_path.clone(),
            to: naming.final_video_path.clone(),
            source,
        })
    }

    /// Never fails the download: every problem is logged and skipped.
    async fn acquire_subtitles(&self, url: &str, request: &DownloadRequest, naming: &DerivedNaming) {
        let spinner = self.progress.spinner("Fetching subtitles");
        let options = SubtitleOptions {
            include_automatic: false,
            include_all: true,
            language: self.subtitle_language.clone(),
            destination: request.output_dir.clone(),
        };

        let files = match self.source.fetch_subtitles(url, &options).await {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(video_id = %request.video_id, error = %e, "Subtitle download failed");
                spinner.warn("Subtitles unavailable");
                return;
            }
        };

        let mut placed = 0usize;
        for name in files {
            let file = SubtitleFile {
                remote_path: request.output_dir.join(&name),
                language_extension: subtitle_suffix(&name),
            };
            match self.place_subtitle(&file, naming, &request.output_dir).await {
                Ok(true) => placed += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        video_id = %request.video_id,
                        file = %name,
                        error = %e,
                        "Failed to rename subtitle"
                    );
                }
            }
        }

        spinner.succeed(&format!("Saved {} subtitle file(s)", placed));
    }

    /// Moves one subtitle next to the video. `Ok(false)` means it was left
    /// under its original name.
    async fn place_subtitle(
        &self,
        file: &SubtitleFile,
        naming: &DerivedNaming,
        dir: &Path,
    ) -> Result<bool, AppError> {
        let Some(suffix) = file.language_extension.as_deref() else {
            tracing::debug!(file = %file.remote_path.display(), "No language suffix, leaving as is");
            return Ok(false);
        };

        let target = naming.subtitle_path(dir, suffix);
        if self.fs.exists(&target).await {
            tracing::debug!(target = %target.display(), "Subtitle target exists, not overwriting");
            return Ok(false);
        }

        self.fs
            .rename(&file.remote_path, &target)
            .await
            .map_err(|source| AppError::Commit {
                from: file.remote_path.clone(),
                to: target,
                source,
            })?;
        Ok(true)
    }
}

fn enter(request: &DownloadRequest, phase: DownloadPhase) {
    tracing::debug!(video_id = %request.video_id, ?phase, "Download phase");
}

fn fail(request: &DownloadRequest, error: AppError) -> DownloadOutcome {
    enter(request, DownloadPhase::Failed);
    DownloadOutcome::Failed(error)
}
