#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use simple_video_downloader::{
    ui::TerminalProgress, DownloadCoordinator, DownloadOutcome, DownloadRequest, SourceConfig,
};
use tempfile::TempDir;

/// Fake yt-dlp: info JSON pointing at `media_url`, and one subtitle file
/// written next to the output template.
fn write_stub(dir: &Path, media_url: &str) -> PathBuf {
    let script_path = dir.join("yt-dlp");
    let script = format!(
        r#"#!/usr/bin/env bash
args=("$@")
output=""
for ((i=0; i<${{#args[@]}}; i++)); do
  if [[ "${{args[$i]}}" == "-o" ]]; then
    output="${{args[$((i+1))]}}"
  fi
done
if printf '%s\n' "${{args[@]}}" | grep -q -- 'gone12345ab'; then
  echo "ERROR: [youtube] gone12345ab: This video has been removed by the user" >&2
  exit 1
fi
if printf '%s\n' "${{args[@]}}" | grep -q -- '--dump-single-json'; then
  echo '{{"id":"abc123","title":"Remote Title","filesize":2048,"url":"{media_url}"}}'
  exit 0
fi
if printf '%s\n' "${{args[@]}}" | grep -q -- '--write-subs'; then
  target="${{output//%(title)s/Remote Title}}"
  target="${{target//%(id)s/abc123}}"
  target="${{target//%(ext)s/en.vtt}}"
  echo "WEBVTT" > "$target"
  echo "[info] Writing video subtitles to: $target"
  exit 0
fi
exit 2
"#
    );
    std::fs::write(&script_path, script).unwrap();
    let mut perms = std::fs::metadata(&script_path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&script_path, perms).unwrap();
    script_path
}

fn coordinator(bin_dir: &TempDir, media_url: &str) -> DownloadCoordinator {
    let config = SourceConfig {
        binary: write_stub(bin_dir.path(), media_url),
        ..Default::default()
    };
    DownloadCoordinator::from_config(config).with_progress(Arc::new(TerminalProgress::hidden()))
}

#[tokio::test]
async fn test_download_video_and_subtitles() {
    let mut server = mockito::Server::new_async().await;
    let body = vec![3u8; 2048];
    let mock = server
        .mock("GET", "/media/abc123.mp4")
        .with_status(200)
        .with_body(&body)
        .expect(1)
        .create_async()
        .await;

    let bin_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let media_url = format!("{}/media/abc123.mp4", server.url());
    let coordinator = coordinator(&bin_dir, &media_url);
    let request = DownloadRequest::new("abc123", out_dir.path(), "07", "Local: Title");

    let outcome = coordinator.download(&request).await;

    assert_eq!(outcome.file_name(), "07. Local Title-abc123.mp4");
    mock.assert_async().await;
    assert_eq!(
        std::fs::read(out_dir.path().join("07. Local Title-abc123.mp4")).unwrap(),
        body
    );
    assert!(out_dir.path().join("07. Local Title-abc123.en.vtt").exists());
    assert!(!out_dir.path().join("Remote Title-abc123.en.vtt").exists());
    assert!(!out_dir.path().join(".07. Local Title-abc123.mp4").exists());

    // Second run finds the committed file and does not fetch again.
    let again = coordinator.download(&request).await;
    assert!(matches!(again, DownloadOutcome::Completed(ref name) if name == "07. Local Title-abc123.mp4"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_removed_video_is_skipped() {
    let bin_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let coordinator = coordinator(&bin_dir, "http://127.0.0.1:9/unused");
    let request = DownloadRequest::new("gone12345ab", out_dir.path(), "01", "Gone");

    let outcome = coordinator.download(&request).await;

    assert!(matches!(outcome, DownloadOutcome::Skipped));
    assert_eq!(std::fs::read_dir(out_dir.path()).unwrap().count(), 0);
}
