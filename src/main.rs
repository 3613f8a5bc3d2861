use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use simple_video_downloader::{
    domain::DEFAULT_QUALITY_FORMAT, ui::TerminalProgress, utils::require_video_id,
    DownloadCoordinator, DownloadOutcome, DownloadRequest, SourceConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Download one video and its subtitles.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Video ID or watch URL.
    video: String,

    /// Directory the video and subtitles are written to.
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Prefix placed before the title, e.g. a playlist position.
    #[arg(short, long, default_value = "01")]
    prefix: String,

    /// Title used in the file name.
    #[arg(short, long)]
    title: String,

    /// yt-dlp format selector.
    #[arg(short, long, default_value = DEFAULT_QUALITY_FORMAT)]
    format: String,

    /// Pass --verbose through to yt-dlp.
    #[arg(short, long)]
    verbose: bool,

    /// Hide progress bars.
    #[arg(short, long)]
    quiet: bool,

    /// Path to the yt-dlp binary.
    #[arg(long, default_value = "yt-dlp")]
    yt_dlp: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let video_id = match require_video_id(&args.video) {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(input = %args.video, error = %e, "Cannot download");
            return ExitCode::FAILURE;
        }
    };

    let config = SourceConfig {
        binary: args.yt_dlp,
        ..Default::default()
    };
    let mut coordinator = DownloadCoordinator::from_config(config);
    if args.quiet {
        coordinator = coordinator.with_progress(Arc::new(TerminalProgress::hidden()));
    }

    let request = DownloadRequest::new(video_id, args.output_dir, args.prefix, args.title)
        .with_quality_format(args.format)
        .with_verbose(args.verbose);

    match coordinator.download(&request).await {
        DownloadOutcome::Completed(name) => {
            println!("{}", name);
            ExitCode::SUCCESS
        }
        DownloadOutcome::Skipped => ExitCode::SUCCESS,
        DownloadOutcome::Failed(e) => {
            tracing::error!(error = %e, "Download failed");
            ExitCode::FAILURE
        }
    }
}
