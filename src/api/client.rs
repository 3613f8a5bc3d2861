use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::Client;
use thiserror::Error;
use tokio::process::Command;

use super::models::{FetchOptions, InfoResponse, SourceConfig, SubtitleOptions};
use super::{ByteStream, MediaSource};
use crate::domain::RemoteVideoInfo;

const SUBTITLE_WRITE_PREFIX: &str = "[info] Writing video subtitles to: ";
const SUBTITLE_OUTPUT_TEMPLATE: &str = "%(title)s-%(id)s.%(ext)s";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Error reported by the remote source itself.
    #[error("{}", .message.as_deref().unwrap_or("remote source failed without a message"))]
    Remote { message: Option<String> },

    #[error("Failed to run yt-dlp: {0}")]
    Process(#[from] std::io::Error),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Stream URL not found")]
    MissingStreamUrl,
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Clone)]
pub struct YtDlpClient {
    config: SourceConfig,
    http: Client,
}

impl YtDlpClient {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.config.binary);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(ua) = &self.config.user_agent {
            command.arg("--user-agent").arg(ua);
        }
        command
    }

    /// Runs the command and returns stdout, or the remote error on a
    /// non-zero exit.
    async fn run(&self, mut command: Command) -> Result<String> {
        tracing::debug!(binary = %self.config.binary.display(), "Spawning yt-dlp");
        let output = command.output().await?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ApiError::Remote {
                message: remote_error_message(&stderr),
            });
        }

        Ok(stdout)
    }
}

#[async_trait]
impl MediaSource for YtDlpClient {
    async fn fetch_info(&self, url: &str, options: &FetchOptions) -> Result<RemoteVideoInfo> {
        let mut command = self.command();
        command
            .arg("--dump-single-json")
            .arg("--no-playlist")
            .arg("--no-warnings");
        if !options.quality_format.is_empty() {
            command.arg("-f").arg(&options.quality_format);
        }
        if options.verbose {
            command.arg("--verbose");
        }
        command.arg(url);

        let stdout = self.run(command).await?;
        let info: InfoResponse = serde_json::from_str(stdout.trim())
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))?;

        let target = info.stream_target()?;

        Ok(RemoteVideoInfo {
            size_bytes: target.size_bytes,
            stream_url: target.url,
            http_headers: target.http_headers,
        })
    }

    async fn open_stream(&self, info: &RemoteVideoInfo) -> Result<ByteStream> {
        let response = self
            .http
            .get(&info.stream_url)
            .headers(header_map(info))
            .send()
            .await?
            .error_for_status()?;

        Ok(response.bytes_stream().map_err(ApiError::Request).boxed())
    }

    async fn fetch_subtitles(&self, url: &str, options: &SubtitleOptions) -> Result<Vec<String>> {
        // "all" takes every track the video has, whatever the language.
        let languages = if options.include_all {
            "all".to_string()
        } else {
            options.language.clone()
        };
        let template = options.destination.join(SUBTITLE_OUTPUT_TEMPLATE);

        let mut command = self.command();
        command
            .arg("--skip-download")
            .arg("--no-playlist")
            .arg("--write-subs")
            .arg(if options.include_automatic {
                "--write-auto-subs"
            } else {
                "--no-write-auto-subs"
            })
            .arg("--sub-langs")
            .arg(languages)
            .arg("-o")
            .arg(template)
            .arg(url);

        let stdout = self.run(command).await?;
        Ok(parse_written_subtitles(&stdout))
    }
}

fn header_map(info: &RemoteVideoInfo) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in &info.http_headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            headers.insert(name, value);
        }
    }
    if !headers.contains_key(USER_AGENT) {
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("simple-video-downloader/", env!("CARGO_PKG_VERSION"))),
        );
    }
    headers
}

/// Last `ERROR:` line of yt-dlp's stderr, without the prefix.
fn remote_error_message(stderr: &str) -> Option<String> {
    stderr
        .lines()
        .rev()
        .find_map(|line| line.trim().strip_prefix("ERROR:"))
        .map(|msg| msg.trim().to_string())
        .filter(|msg| !msg.is_empty())
}

/// File names announced on yt-dlp's stdout while writing subtitles.
fn parse_written_subtitles(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| line.trim().strip_prefix(SUBTITLE_WRITE_PREFIX))
        .filter_map(|path| Path::new(path.trim()).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect()
}
