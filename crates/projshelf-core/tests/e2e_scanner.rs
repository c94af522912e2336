/// End-to-end scanner integration tests.
///
/// These exercise the real `walk::scan_workspace` code path against a real
/// temporary filesystem, verifying that the scanner enumerates projects,
/// folders, and files, aggregates sizes, and reports progress through the
/// channel. The scanner creates a real OS thread and writes to a shared
/// `Arc<RwLock<ProjectTree>>`, so an integration test with `tempfile`
/// covers every code path with zero mocking.
use projshelf_core::model::NodeKind;
use projshelf_core::scanner::progress::ScanProgress;
use projshelf_core::scanner::{start_scan, ScanHandle, PROGRESS_CHANNEL_CAPACITY};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Create a reproducible workspace for scanner tests:
///
/// ```text
/// root/
///   alpha/
///     a.txt      (100 bytes)
///     notes/
///       b.md     (200 bytes)
///   beta/
///     c.png      (300 bytes)
///   stray.txt    (400 bytes)   <- top-level file, must be ignored
/// ```
fn build_workspace(root: &Path) {
    let alpha = root.join("alpha");
    let beta = root.join("beta");
    fs::create_dir_all(alpha.join("notes")).unwrap();
    fs::create_dir_all(&beta).unwrap();

    write_bytes(&alpha.join("a.txt"), 100);
    write_bytes(&alpha.join("notes").join("b.md"), 200);
    write_bytes(&beta.join("c.png"), 300);
    write_bytes(&root.join("stray.txt"), 400);
}

fn write_bytes(path: &Path, n: usize) {
    let mut f = fs::File::create(path).unwrap();
    f.write_all(&vec![0u8; n]).unwrap();
}

/// Drain progress messages until `Complete` arrives (or panic after a
/// generous timeout so a stuck scanner cannot hang the suite).
fn drain_to_completion(handle: &ScanHandle) -> Duration {
    let deadline = std::time::Instant::now() + Duration::from_secs(30);
    loop {
        assert!(
            std::time::Instant::now() < deadline,
            "scanner did not complete within 30 seconds"
        );
        match handle.progress_rx.try_recv() {
            Ok(ScanProgress::Complete { duration, .. }) => return duration,
            Ok(ScanProgress::Cancelled) => panic!("scan was unexpectedly cancelled"),
            Ok(_) => continue,
            Err(crossbeam_channel::TryRecvError::Empty) => {
                std::thread::sleep(Duration::from_millis(10));
            }
            Err(crossbeam_channel::TryRecvError::Disconnected) => {
                panic!("scanner channel disconnected before Complete was sent");
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// The scanner must find both projects and all files beneath them.
#[test]
fn scan_discovers_projects_and_files() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_workspace(tmp.path());

    let handle = start_scan(tmp.path().to_path_buf());
    drain_to_completion(&handle);

    let tree = handle.live_tree.read();
    assert_eq!(tree.roots.len(), 2, "alpha and beta are projects");
    // 2 projects + 1 folder + 3 files = 6 nodes (stray.txt excluded).
    assert_eq!(tree.len(), 6, "unexpected node count");
    assert_eq!(tree.total_size, 600);
}

/// Top-level stray files must not appear in the tree.
#[test]
fn scan_ignores_files_directly_under_root() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_workspace(tmp.path());

    let handle = start_scan(tmp.path().to_path_buf());
    drain_to_completion(&handle);

    let tree = handle.live_tree.read();
    assert!(
        tree.nodes.iter().all(|n| n.name != "stray.txt"),
        "stray.txt must be ignored"
    );
}

/// Project roots are typed `Project`, nested dirs `Folder`, leaves `File`.
#[test]
fn scan_assigns_node_kinds() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_workspace(tmp.path());

    let handle = start_scan(tmp.path().to_path_buf());
    drain_to_completion(&handle);

    let tree = handle.live_tree.read();
    for &root in &tree.roots {
        assert_eq!(tree.node(root).kind, NodeKind::Project);
    }
    let notes = tree
        .nodes
        .iter()
        .find(|n| n.name == "notes")
        .expect("notes folder");
    assert_eq!(notes.kind, NodeKind::Folder);
    let file = tree
        .nodes
        .iter()
        .find(|n| n.name == "b.md")
        .expect("b.md file");
    assert_eq!(file.kind, NodeKind::File);
    assert_eq!(file.size, 200);
}

/// An empty workspace scans to an empty tree — no roots, no nodes.
#[test]
fn scan_empty_workspace() {
    let tmp = TempDir::new().expect("failed to create temp dir");

    let handle = start_scan(tmp.path().to_path_buf());
    drain_to_completion(&handle);

    let tree = handle.live_tree.read();
    assert!(tree.is_empty());
    assert_eq!(tree.total_size, 0);
}

/// Aggregation: project sizes roll up from nested files.
#[test]
fn scan_aggregates_project_sizes() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_workspace(tmp.path());

    let handle = start_scan(tmp.path().to_path_buf());
    drain_to_completion(&handle);

    let tree = handle.live_tree.read();
    let alpha = tree
        .roots
        .iter()
        .copied()
        .find(|&r| tree.node(r).name == "alpha")
        .expect("alpha project");
    assert_eq!(tree.node(alpha).size, 300, "a.txt + b.md");
    assert_eq!(tree.node(alpha).file_count, 2);
}

/// Cancellation must produce a terminal message — either `Cancelled` or,
/// if the walk already finished, `Complete`.
#[test]
fn scan_cancellation_sends_terminal_message() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_workspace(tmp.path());

    let handle = start_scan(tmp.path().to_path_buf());
    handle.cancel();
    assert!(handle.is_cancelled());

    let deadline = std::time::Instant::now() + Duration::from_secs(30);
    let mut received_terminal = false;
    while std::time::Instant::now() < deadline {
        match handle.progress_rx.try_recv() {
            Ok(ScanProgress::Cancelled) | Ok(ScanProgress::Complete { .. }) => {
                received_terminal = true;
                break;
            }
            Ok(_) => continue,
            Err(crossbeam_channel::TryRecvError::Empty) => {
                std::thread::sleep(Duration::from_millis(5));
            }
            Err(crossbeam_channel::TryRecvError::Disconnected) => break,
        }
    }
    assert!(
        received_terminal,
        "scanner must send Cancelled or Complete within 30 s"
    );
}

/// Scanning twice from scratch yields identical shape — the re-walk has no
/// memory of the previous pass.
#[test]
fn rescan_from_scratch_is_reproducible() {
    let tmp = TempDir::new().expect("failed to create temp dir");
    build_workspace(tmp.path());

    let first = start_scan(tmp.path().to_path_buf());
    drain_to_completion(&first);
    let (len1, size1) = {
        let tree = first.live_tree.read();
        (tree.len(), tree.total_size)
    };

    let second = start_scan(tmp.path().to_path_buf());
    drain_to_completion(&second);
    let tree = second.live_tree.read();
    assert_eq!(tree.len(), len1);
    assert_eq!(tree.total_size, size1);
}

/// `PROGRESS_CHANNEL_CAPACITY` must be positive so `send()` never blocks
/// immediately. Compile-time invariant.
const _: () = assert!(
    PROGRESS_CHANNEL_CAPACITY > 0,
    "PROGRESS_CHANNEL_CAPACITY must be > 0"
);
