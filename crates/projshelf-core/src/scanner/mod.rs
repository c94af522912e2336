/// Scanner module — the refresh half of ProjShelf.
///
/// A refresh fully re-walks the workspace from scratch; there is no cache
/// and no incremental update. The walk runs on a dedicated thread writing
/// into a shared `LiveTree` (`Arc<RwLock<ProjectTree>>`) so the UI can
/// render the tree while it grows, with lightweight progress reported over
/// a bounded channel.
pub mod progress;
pub mod walk;

use crate::model::ProjectTree;
use progress::ScanProgress;

use crossbeam_channel::Receiver;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::info;

/// A shared, concurrently-readable workspace tree.
///
/// The scanner holds a write lock briefly when inserting nodes. The UI
/// holds a read lock each frame to render the growing tree.
pub type LiveTree = Arc<RwLock<ProjectTree>>;

/// Maximum number of progress messages that may queue up in the channel.
///
/// The UI drains this channel once per frame; workspace trees are small,
/// so a modest bound is plenty of headroom before back-pressure briefly
/// stalls the scanner instead of growing the heap.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 1_024;

/// Handle to a running or completed scan. Allows cancellation and
/// receiving progress updates.
pub struct ScanHandle {
    /// Receiver for progress updates from the scan thread.
    pub progress_rx: Receiver<ScanProgress>,
    /// Shared tree that is populated incrementally during scanning.
    pub live_tree: LiveTree,
    /// Flag to request cancellation.
    cancel_flag: Arc<AtomicBool>,
    /// Join handle for the scan thread.
    _thread: Option<thread::JoinHandle<()>>,
}

impl ScanHandle {
    /// Request the scan to stop as soon as possible.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }
}

/// Start a full re-walk of the workspace root on a background thread.
///
/// Returns a `ScanHandle` for receiving progress, accessing the live tree,
/// and requesting cancellation.
pub fn start_scan(root_path: PathBuf) -> ScanHandle {
    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel_flag.clone();

    let live_tree: LiveTree = Arc::new(RwLock::new(ProjectTree::with_capacity(4_096)));
    let tree_clone = live_tree.clone();

    let thread = thread::Builder::new()
        .name("projshelf-scanner".into())
        .spawn(move || {
            info!("scanning workspace {}", root_path.display());
            walk::scan_workspace(root_path, progress_tx, cancel_clone, tree_clone);
        })
        .expect("failed to spawn scanner thread");

    ScanHandle {
        progress_rx,
        live_tree,
        cancel_flag,
        _thread: Some(thread),
    }
}
