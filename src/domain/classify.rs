/// What to do with an error reported by the remote source while fetching
/// video info.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Permanently unavailable; log and resolve as skipped.
    Skip,
    /// Unexpected; hand the original error back to the caller.
    Propagate,
}

/// Checked in order, case-sensitive substring match, first hit wins.
pub const REMOTE_ERROR_TABLE: &[(&str, Disposition)] = &[
    ("video is unavailable", Disposition::Skip),
    ("video has been removed by the user", Disposition::Skip),
    ("sign in to view this video", Disposition::Skip),
    ("video is no longer available", Disposition::Skip),
];

pub fn classify(message: Option<&str>) -> Disposition {
    let Some(message) = message else {
        return Disposition::Propagate;
    };

    REMOTE_ERROR_TABLE
        .iter()
        .find(|(pattern, _)| message.contains(pattern))
        .map(|(_, disposition)| *disposition)
        .unwrap_or(Disposition::Propagate)
}
