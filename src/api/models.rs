use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ApiError;

/// Subset of the `--dump-single-json` document we rely on
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InfoResponse {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub filesize_approx: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub http_headers: HashMap<String, String>,
    #[serde(default)]
    pub requested_formats: Vec<FormatResponse>,
}

/// One entry of `requested_formats` when the selector picks several streams
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FormatResponse {
    pub format_id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub filesize_approx: Option<u64>,
    #[serde(default)]
    pub http_headers: HashMap<String, String>,
}

impl FormatResponse {
    fn size(&self) -> Option<u64> {
        self.filesize.or(self.filesize_approx)
    }
}

/// The single media file the transfer will fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamTarget {
    pub url: String,
    pub http_headers: HashMap<String, String>,
    /// Size estimate of this file only; zero when the source gives none.
    pub size_bytes: u64,
}

impl InfoResponse {
    fn size(&self) -> Option<u64> {
        self.filesize.or(self.filesize_approx)
    }

    /// Resolves the one file to stream. Selectors that need several streams
    /// merged locally are rejected, since only one body is ever fetched.
    pub fn stream_target(&self) -> Result<StreamTarget, ApiError> {
        if let Some(url) = &self.url {
            return Ok(StreamTarget {
                url: url.clone(),
                http_headers: self.http_headers.clone(),
                size_bytes: self.size().unwrap_or(0),
            });
        }

        match self.requested_formats.as_slice() {
            [] => Err(ApiError::MissingStreamUrl),
            [format] => {
                let url = format.url.clone().ok_or(ApiError::MissingStreamUrl)?;
                let http_headers = if format.http_headers.is_empty() {
                    self.http_headers.clone()
                } else {
                    format.http_headers.clone()
                };
                Ok(StreamTarget {
                    url,
                    http_headers,
                    size_bytes: format.size().or(self.size()).unwrap_or(0),
                })
            }
            formats => Err(ApiError::InvalidResponse(format!(
                "format selector requires merging {} streams ({}); choose a single-file format",
                formats.len(),
                formats
                    .iter()
                    .map(|f| f.format_id.as_str())
                    .collect::<Vec<_>>()
                    .join("+")
            ))),
        }
    }
}

/// Options forwarded with the info request
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub quality_format: String,
    pub verbose: bool,
}

/// Options for the subtitle-only request
#[derive(Debug, Clone)]
pub struct SubtitleOptions {
    pub include_automatic: bool,
    pub include_all: bool,
    pub language: String,
    pub destination: PathBuf,
}

/// Configuration for the yt-dlp backed source
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub binary: PathBuf,
    pub watch_url_base: String,
    pub subtitle_language: String,
    pub user_agent: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("yt-dlp"),
            watch_url_base: "https://www.youtube.com/watch?v=".to_string(),
            subtitle_language: "en".to_string(),
            user_agent: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_format_info() {
        let info: InfoResponse = serde_json::from_value(json!({
            "id": "abc123",
            "title": "My Title",
            "filesize": 1000,
            "url": "https://cdn.example/v.mp4",
            "http_headers": {"User-Agent": "ua"}
        }))
        .unwrap();

        let target = info.stream_target().unwrap();
        assert_eq!(target.size_bytes, 1000);
        assert_eq!(target.url, "https://cdn.example/v.mp4");
        assert_eq!(target.http_headers.get("User-Agent").map(String::as_str), Some("ua"));
    }

    #[test]
    fn test_single_requested_format_sizes_from_that_format() {
        let info: InfoResponse = serde_json::from_value(json!({
            "id": "abc123",
            "filesize_approx": 9999,
            "requested_formats": [
                {"format_id": "18", "url": "https://cdn.example/18", "filesize": 700}
            ]
        }))
        .unwrap();

        let target = info.stream_target().unwrap();
        assert_eq!(target.url, "https://cdn.example/18");
        assert_eq!(target.size_bytes, 700);
    }

    #[test]
    fn test_merged_formats_are_rejected() {
        let info: InfoResponse = serde_json::from_value(json!({
            "id": "abc123",
            "requested_formats": [
                {"format_id": "137", "url": "https://cdn.example/video", "filesize": 700},
                {"format_id": "140", "url": "https://cdn.example/audio", "filesize_approx": 300}
            ]
        }))
        .unwrap();

        match info.stream_target() {
            Err(ApiError::InvalidResponse(msg)) => assert!(msg.contains("137+140")),
            other => panic!("unexpected target: {other:?}"),
        }
    }

    #[test]
    fn test_missing_url_and_size() {
        let info: InfoResponse = serde_json::from_value(json!({"id": "abc123"})).unwrap();
        assert!(matches!(info.stream_target(), Err(ApiError::MissingStreamUrl)));

        let info: InfoResponse = serde_json::from_value(json!({
            "id": "abc123",
            "url": "https://cdn.example/v.mp4"
        }))
        .unwrap();
        assert_eq!(info.stream_target().unwrap().size_bytes, 0);
    }
}
