/// Directory walker — re-builds the workspace tree from the filesystem.
///
/// Uses `jwalk`'s parallel traversal to walk the workspace root, writing
/// nodes into a shared `LiveTree` as they are discovered. Only directories
/// directly under the root become projects; stray files at the top level
/// are ignored for display. Everything deeper becomes folder and file
/// nodes.
///
/// Workspace trees are small, so nodes are inserted under one short write
/// lock each; no batching is needed.
use crate::model::{Node, NodeIndex, NodeKind};
use crate::scanner::progress::ScanProgress;
use crate::scanner::LiveTree;
use compact_str::CompactString;
use crossbeam_channel::Sender;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// How often (in walked entries) the cancel flag is checked.
const CANCEL_CHECK_INTERVAL: u64 = 64;

/// How often (in walked entries) counters are sent and live sizes refreshed.
const PROGRESS_INTERVAL: u64 = 256;

/// Walk the workspace root and populate `live_tree`.
///
/// Sends `ScanProgress` messages over `progress_tx` and finishes with
/// either `Complete` or `Cancelled`.
pub fn scan_workspace(
    root_path: PathBuf,
    progress_tx: Sender<ScanProgress>,
    cancel_flag: Arc<AtomicBool>,
    live_tree: LiveTree,
) {
    let start = Instant::now();
    let mut error_count: u64 = 0;
    let mut files_found: u64 = 0;
    let mut dirs_found: u64 = 0;
    let mut total_size: u64 = 0;
    let mut walked: u64 = 0;

    // Map from directory path to its NodeIndex in the arena. The workspace
    // root itself is not a node, so it never appears here; entries whose
    // parent is the root are handled as project roots.
    let mut dir_map: HashMap<PathBuf, NodeIndex> = HashMap::with_capacity(256);

    let walker = jwalk::WalkDir::new(&root_path)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true)
        .parallelism(jwalk::Parallelism::RayonNewPool(num_cpus::get()));

    for entry_result in walker {
        walked += 1;
        if walked.is_multiple_of(CANCEL_CHECK_INTERVAL) && cancel_flag.load(Ordering::Relaxed) {
            let _ = progress_tx.send(ScanProgress::Cancelled);
            return;
        }

        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                error_count += 1;
                // jwalk errors are typically access-denied on directories.
                let err_path = err
                    .path()
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_default();

                // Keep an error placeholder in the tree when the parent is known.
                if let Some(entry_path) = err.path() {
                    insert_error_node(&live_tree, &mut dir_map, entry_path, &root_path);
                }

                let _ = progress_tx.send(ScanProgress::Error {
                    path: err_path,
                    message: format!("{err}"),
                });
                continue;
            }
        };

        let path = entry.path();

        // Skip the root itself — it is not a node.
        if path == root_path {
            continue;
        }

        let parent_path = match path.parent() {
            Some(p) => p.to_path_buf(),
            None => continue,
        };

        let name = CompactString::new(entry.file_name().to_string_lossy().as_ref());

        if parent_path == root_path {
            // Top level: directories are projects, stray files are ignored.
            if entry.file_type().is_dir() {
                let idx = {
                    let mut tree = live_tree.write();
                    tree.add_project(name)
                };
                dir_map.insert(path, idx);
                dirs_found += 1;
            }
            continue;
        }

        let parent_idx = match dir_map.get(&parent_path) {
            Some(&idx) => idx,
            // Parent not seen yet (jwalk ordering on wide trees) — create
            // the missing ancestor chain.
            None => ensure_ancestors(&live_tree, &mut dir_map, &parent_path, &root_path),
        };

        if entry.file_type().is_dir() {
            let node = Node::new_dir(name, NodeKind::Folder, Some(parent_idx));
            let idx = {
                let mut tree = live_tree.write();
                let idx = tree.add_node(node);
                tree.add_child(parent_idx, idx);
                idx
            };
            dir_map.insert(path.clone(), idx);
            dirs_found += 1;
        } else {
            // Stat outside the lock — this is the expensive syscall.
            let node = match std::fs::symlink_metadata(&path) {
                Ok(meta) => {
                    let mut node = Node::new_file(name, meta.len(), Some(parent_idx));
                    node.modified = meta.modified().ok();
                    total_size += meta.len();
                    files_found += 1;
                    node
                }
                Err(err) => {
                    error_count += 1;
                    let _ = progress_tx.send(ScanProgress::Error {
                        path: path.to_string_lossy().to_string(),
                        message: format!("{err}"),
                    });
                    Node::new_error(name, NodeKind::File, Some(parent_idx))
                }
            };
            let mut tree = live_tree.write();
            let idx = tree.add_node(node);
            tree.add_child(parent_idx, idx);
        }

        if walked.is_multiple_of(PROGRESS_INTERVAL) {
            // Refresh live sizes so the growing tree renders with totals.
            {
                let mut tree = live_tree.write();
                tree.aggregate();
            }
            let _ = progress_tx.send(ScanProgress::Update {
                files_found,
                dirs_found,
                total_size,
                current_path: path.to_string_lossy().into_owned(),
            });
        }
    }

    debug!(
        "walk complete: {} files, {} dirs in {:?}",
        files_found,
        dirs_found,
        start.elapsed()
    );

    {
        let mut tree = live_tree.write();
        tree.aggregate();
    }

    let _ = progress_tx.send(ScanProgress::Complete {
        duration: start.elapsed(),
        error_count,
    });
}

/// Insert an error placeholder for an unreadable entry, when its position
/// in the tree can be determined.
fn insert_error_node(
    live_tree: &LiveTree,
    dir_map: &mut HashMap<PathBuf, NodeIndex>,
    entry_path: &Path,
    root_path: &Path,
) {
    let Some(parent_path) = entry_path.parent() else {
        return;
    };
    let name = entry_path
        .file_name()
        .map(|n| CompactString::new(n.to_string_lossy().as_ref()))
        .unwrap_or_else(|| CompactString::new("<unreadable>"));

    if parent_path == root_path {
        // An unreadable project directory: keep it visible as a root.
        let mut tree = live_tree.write();
        let idx = tree.add_node(Node::new_error(name, NodeKind::Project, None));
        tree.roots.push(idx);
        return;
    }

    if let Some(&parent_idx) = dir_map.get(parent_path) {
        // jwalk only errors on directory reads, so assume a folder.
        let mut tree = live_tree.write();
        let idx = tree.add_node(Node::new_error(name, NodeKind::Folder, Some(parent_idx)));
        tree.add_child(parent_idx, idx);
    }
}

/// Ensure all ancestor directories of `target` exist in the tree and
/// `dir_map`, creating any missing chain from the root downward.
///
/// The first component under the root is a project; everything deeper is a
/// folder.
fn ensure_ancestors(
    live_tree: &LiveTree,
    dir_map: &mut HashMap<PathBuf, NodeIndex>,
    target: &Path,
    root_path: &Path,
) -> NodeIndex {
    let mut missing: Vec<PathBuf> = Vec::new();
    let mut current = target.to_path_buf();

    while !dir_map.contains_key(&current) && current != *root_path {
        missing.push(current.clone());
        match current.parent() {
            Some(p) => current = p.to_path_buf(),
            None => break,
        }
    }

    let mut parent_idx = dir_map.get(&current).copied();

    for ancestor in missing.into_iter().rev() {
        let name = ancestor
            .file_name()
            .map(|n| CompactString::new(n.to_string_lossy().as_ref()))
            .unwrap_or_default();

        let idx = {
            let mut tree = live_tree.write();
            match parent_idx {
                Some(pidx) => {
                    let idx =
                        tree.add_node(Node::new_dir(name, NodeKind::Folder, Some(pidx)));
                    tree.add_child(pidx, idx);
                    idx
                }
                // Directly under the root: a project.
                None => tree.add_project(name),
            }
        };
        dir_map.insert(ancestor, idx);
        parent_idx = Some(idx);
    }

    // `target` is now guaranteed to be in the map.
    dir_map[target]
}
