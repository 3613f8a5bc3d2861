//! Terminal progress for a single download: a spinner while waiting on the
//! remote source, and a byte bar while the video streams in.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub trait ProgressReporter: Send + Sync {
    fn spinner(&self, label: &str) -> Box<dyn Spinner>;

    fn transfer(&self, total: u64) -> Box<dyn TransferBar>;
}

pub trait Spinner: Send {
    fn succeed(&self, message: &str);
    fn fail(&self, message: &str);
    fn warn(&self, message: &str);
}

pub trait TransferBar: Send {
    /// Absolute number of bytes transferred so far.
    fn update(&self, current: u64);
    /// Resizes the bar to `total` and shows it full.
    fn finish(&self, total: u64);
    /// Stops the bar where it is.
    fn stop(&self);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalProgress {
    hidden: bool,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self { hidden: false }
    }

    /// Same behavior, nothing drawn.
    pub fn hidden() -> Self {
        Self { hidden: true }
    }

    fn bar(&self, total: Option<u64>) -> ProgressBar {
        match (self.hidden, total) {
            (true, _) => ProgressBar::hidden(),
            (false, Some(total)) => ProgressBar::new(total),
            (false, None) => ProgressBar::new_spinner(),
        }
    }
}

impl ProgressReporter for TerminalProgress {
    fn spinner(&self, label: &str) -> Box<dyn Spinner> {
        let pb = self.bar(None);
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(label.to_string());
        if !self.hidden {
            pb.enable_steady_tick(Duration::from_millis(100));
        }
        Box::new(TerminalSpinner { pb })
    }

    fn transfer(&self, total: u64) -> Box<dyn TransferBar> {
        let pb = self.bar(Some(total));
        if let Ok(style) = ProgressStyle::with_template(
            "[{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        Box::new(TerminalBar { pb })
    }
}

struct TerminalSpinner {
    pb: ProgressBar,
}

impl Spinner for TerminalSpinner {
    fn succeed(&self, message: &str) {
        self.pb.finish_with_message(format!("✔ {}", message));
    }

    fn fail(&self, message: &str) {
        self.pb.abandon_with_message(format!("✖ {}", message));
    }

    fn warn(&self, message: &str) {
        self.pb.abandon_with_message(format!("⚠ {}", message));
    }
}

struct TerminalBar {
    pb: ProgressBar,
}

impl TransferBar for TerminalBar {
    fn update(&self, current: u64) {
        self.pb.set_position(current);
    }

    fn finish(&self, total: u64) {
        self.pb.set_length(total);
        self.pb.set_position(total);
        self.pb.finish();
    }

    fn stop(&self) {
        self.pb.abandon();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_progress_is_usable() {
        let progress = TerminalProgress::hidden();

        let spinner = progress.spinner("Fetching info");
        spinner.succeed("done");

        let bar = progress.transfer(1000);
        bar.update(500);
        bar.update(1000);
        bar.stop();
    }

    #[test]
    fn test_finish_fills_bar_when_estimate_was_wrong() {
        let bar = TerminalBar {
            pb: ProgressBar::hidden(),
        };
        bar.pb.set_length(0);
        bar.update(1500);

        bar.finish(1500);

        assert_eq!(bar.pb.length(), Some(1500));
        assert_eq!(bar.pb.position(), 1500);
        assert!(bar.pb.is_finished());
    }
}
