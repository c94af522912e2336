/// Scan progress reporting — lightweight messages sent from the scan
/// thread to the UI thread via a crossbeam channel.
use std::time::Duration;

/// Progress updates sent from the scan thread to the UI.
///
/// The actual tree data is in the shared `LiveTree`; these messages
/// carry only counters and status flags.
#[derive(Debug)]
pub enum ScanProgress {
    /// Periodic update with running totals.
    Update {
        files_found: u64,
        dirs_found: u64,
        total_size: u64,
        current_path: String,
    },
    /// A non-fatal error (e.g. permission denied on one entry).
    Error { path: String, message: String },
    /// Scanning completed. The finished tree is in the shared `LiveTree`
    /// (already aggregated).
    Complete {
        duration: Duration,
        error_count: u64,
    },
    /// Scan was cancelled by the user.
    Cancelled,
}
