use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::domain::AppError;

/// Trailing `.<lang>[-region].<ext>` of a subtitle file name.
static SUBTITLE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.[A-Za-z]{2,3}(?:[-_][A-Za-z0-9]{1,8})*\.[A-Za-z0-9]{2,5}$")
        .expect("subtitle suffix pattern is valid")
});

static VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("video id pattern is valid"));

/// Strip characters that are unsafe in file names
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim_matches(|c: char| c == '.' || c.is_whitespace())
        .to_string()
}

/// Language and format suffix of a subtitle file name, e.g. `.en.vtt`.
pub fn subtitle_suffix(file_name: &str) -> Option<String> {
    SUBTITLE_SUFFIX
        .find(file_name)
        .map(|m| m.as_str().to_string())
}

/// Accepts a bare video id or any of the usual YouTube URL shapes.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if VIDEO_ID.is_match(input) {
        return Some(input.to_string());
    }

    let url = Url::parse(input).ok()?;
    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");

    let candidate = match host {
        "youtu.be" => url.path_segments()?.next().map(str::to_string),
        "youtube.com" | "music.youtube.com" => {
            let mut segments = url.path_segments()?;
            match segments.next() {
                Some("watch") => url
                    .query_pairs()
                    .find(|(k, _)| k == "v")
                    .map(|(_, v)| v.into_owned()),
                Some("shorts") | Some("embed") | Some("live") => {
                    segments.next().map(str::to_string)
                }
                _ => None,
            }
        }
        _ => None,
    }?;

    VIDEO_ID.is_match(&candidate).then_some(candidate)
}

/// Like [`extract_video_id`], for callers that need an error to report.
pub fn require_video_id(input: &str) -> Result<String, AppError> {
    extract_video_id(input).ok_or(AppError::InvalidInput)
}

/// Canonical watch URL for a video id.
pub fn watch_url(base: &str, video_id: &str) -> String {
    format!("{}{}", base, video_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("test/file.mp4"), "testfile.mp4");
        assert_eq!(sanitize_filename("normal-name"), "normal-name");
        assert_eq!(sanitize_filename("  What?  Why*  "), "What  Why");
        assert_eq!(sanitize_filename("..hidden.."), "hidden");
        assert_eq!(sanitize_filename("tab\tname"), "tabname");
    }

    #[test]
    fn test_subtitle_suffix() {
        assert_eq!(
            subtitle_suffix("My Title-abc123.en.vtt").as_deref(),
            Some(".en.vtt")
        );
        assert_eq!(
            subtitle_suffix("Some.Dotted.Title-xyz.en-GB.srt").as_deref(),
            Some(".en-GB.srt")
        );
        assert_eq!(subtitle_suffix("video.mp4"), None);
        assert_eq!(subtitle_suffix("no-extension"), None);
    }

    #[test]
    fn test_extract_video_id() {
        assert_eq!(extract_video_id("dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://youtube.com/shorts/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(extract_video_id("https://example.com/watch?v=dQw4w9WgXcQ"), None);
        assert_eq!(extract_video_id("not a video"), None);
    }

    #[test]
    fn test_require_video_id() {
        assert_eq!(
            require_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert!(matches!(
            require_video_id("https://example.com/"),
            Err(AppError::InvalidInput)
        ));
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            watch_url("https://www.youtube.com/watch?v=", "abc123"),
            "https://www.youtube.com/watch?v=abc123"
        );
    }
}
