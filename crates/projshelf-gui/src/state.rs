/// Application state management.
///
/// Centralises all mutable state that the UI reads and writes. The scan
/// thread communicates via channels; state updates happen in
/// `process_scan_messages()` which runs once per frame.
///
/// Workspace mutations are dispatched from here: each handler makes one
/// synchronous `Workspace` call, records the outcome in the status line or
/// an error dialog, and triggers a full re-scan.
use crate::dialogs::{DialogService, NativeDialogs};
use projshelf_core::config::{self, AppConfig};
use projshelf_core::export;
use projshelf_core::model::{NodeIndex, ProjectTree};
use projshelf_core::pdf;
use projshelf_core::scanner::progress::ScanProgress;
use projshelf_core::scanner::{self, LiveTree, ScanHandle};
use projshelf_core::workspace::Workspace;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The current phase of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPhase {
    /// Fresh start — no scan has run yet.
    Idle,
    /// A re-walk of the workspace is in progress.
    Scanning,
    /// The tree reflects the last completed walk.
    Ready,
}

/// A row in the flattened visible-rows list for the virtualised tree view.
#[derive(Clone, Debug)]
pub struct VisibleRow {
    /// Index into the `ProjectTree` arena.
    pub node_index: NodeIndex,
    /// Nesting depth (0 = project).
    pub depth: u16,
    /// Whether this directory is currently expanded (meaningless for files).
    pub is_expanded: bool,
}

/// What a pending name-input dialog will create.
#[derive(Debug, Clone)]
pub enum NameTarget {
    Project,
    Folder { parent: PathBuf },
}

/// The modal dialog currently open, if any.
///
/// These are the egui equivalents of the classic input / confirm /
/// message-box dialogs; only one is shown at a time.
#[derive(Debug)]
pub enum Modal {
    NameInput { target: NameTarget, buffer: String },
    ConfirmDelete { path: PathBuf, is_dir: bool },
    Error { title: String, message: String },
    PdfView { title: String, content: String },
}

/// Maximum scan-progress messages drained from the channel per frame.
///
/// Prevents a backlog (e.g. after the window was hidden) from blocking the
/// render thread for a perceptible duration.
const MAX_MESSAGES_PER_FRAME: usize = 300;

/// Cap on retained per-entry scan errors.
const MAX_SCAN_ERRORS: usize = 200;

/// Maximum rows in the virtualised tree-view visible-rows list.
const MAX_VISIBLE_ROWS: usize = 100_000;

/// All application state.
pub struct AppState {
    /// The workspace all operations act on.
    pub workspace: Workspace,
    pub config: AppConfig,

    // ── Scan ───────────────────────────────────────────
    pub phase: AppPhase,
    pub scan_handle: Option<ScanHandle>,
    pub scan_files_found: u64,
    pub scan_dirs_found: u64,
    pub scan_total_size: u64,
    pub scan_current_path: String,
    pub scan_error_count: u64,
    pub scan_duration: Option<Duration>,
    pub scan_errors: Vec<(String, String)>,

    // ── Results ────────────────────────────────────────
    /// The completed tree (set once a scan finishes).
    pub tree: Option<ProjectTree>,
    /// The live tree reference during scanning (for the real-time view).
    pub live_tree: Option<LiveTree>,
    pub visible_rows: Vec<VisibleRow>,
    pub selected_node: Option<NodeIndex>,
    /// Node count at the last live-tree snapshot, so we know when to
    /// rebuild visible rows.
    live_tree_last_len: usize,

    // ── UI state ───────────────────────────────────────
    pub modal: Option<Modal>,
    /// Outcome of the last operation, shown in the status bar.
    pub status: String,
    pub show_about: bool,
    /// `true` = dark mode (default), `false` = light mode.
    pub dark_mode: bool,

    dialogs: Box<dyn DialogService>,
}

impl AppState {
    /// Create application state with native OS dialogs.
    pub fn new(workspace: Workspace, config: AppConfig) -> Self {
        Self::with_dialogs(workspace, config, Box::new(NativeDialogs))
    }

    /// Create application state with an injected dialog service.
    ///
    /// Tests use this with a stub so no OS dialog ever opens.
    pub fn with_dialogs(
        workspace: Workspace,
        config: AppConfig,
        dialogs: Box<dyn DialogService>,
    ) -> Self {
        let dark_mode = config.dark_mode;
        Self {
            workspace,
            config,
            phase: AppPhase::Idle,
            scan_handle: None,
            scan_files_found: 0,
            scan_dirs_found: 0,
            scan_total_size: 0,
            scan_current_path: String::new(),
            scan_error_count: 0,
            scan_duration: None,
            scan_errors: Vec::new(),
            tree: None,
            live_tree: None,
            visible_rows: Vec::new(),
            selected_node: None,
            live_tree_last_len: 0,
            modal: None,
            status: String::from("Ready"),
            show_about: false,
            dark_mode,
            dialogs,
        }
    }

    // ── Refresh ─────────────────────────────────────────────────────────

    /// Start a full re-walk of the workspace.
    ///
    /// The previous tree is discarded: every refresh rebuilds from scratch.
    pub fn refresh(&mut self) {
        self.phase = AppPhase::Scanning;
        self.scan_files_found = 0;
        self.scan_dirs_found = 0;
        self.scan_total_size = 0;
        self.scan_current_path.clear();
        self.scan_error_count = 0;
        self.scan_duration = None;
        self.scan_errors.clear();
        self.tree = None;
        self.visible_rows.clear();
        self.selected_node = None;
        self.live_tree_last_len = 0;

        let handle = scanner::start_scan(self.workspace.root().to_path_buf());
        self.live_tree = Some(handle.live_tree.clone());
        self.scan_handle = Some(handle);
    }

    /// Cancel any running scan.
    pub fn cancel_scan(&mut self) {
        if let Some(ref handle) = self.scan_handle {
            handle.cancel();
        }
    }

    /// Get the completed tree, if any.
    pub fn current_tree(&self) -> Option<&ProjectTree> {
        self.tree.as_ref()
    }

    /// Process pending scan progress messages. Called once per frame.
    ///
    /// Returns `true` if the UI should repaint (new data arrived).
    pub fn process_scan_messages(&mut self) -> bool {
        if self.scan_handle.is_none() {
            return false;
        }

        let mut repaint = false;
        let mut messages_this_frame = 0usize;

        while messages_this_frame < MAX_MESSAGES_PER_FRAME {
            let msg = {
                let handle = match &self.scan_handle {
                    Some(h) => h,
                    None => break,
                };
                handle.progress_rx.try_recv()
            };
            let msg = match msg {
                Ok(m) => m,
                Err(crossbeam_channel::TryRecvError::Empty) => break,
                Err(crossbeam_channel::TryRecvError::Disconnected) => {
                    // Scan thread died without a terminal message — keep
                    // whatever made it into the live tree.
                    tracing::warn!("scanner channel disconnected unexpectedly");
                    self.finalize_scan();
                    return true;
                }
            };
            messages_this_frame += 1;
            repaint = true;
            match msg {
                ScanProgress::Update {
                    files_found,
                    dirs_found,
                    total_size,
                    current_path,
                } => {
                    self.scan_files_found = files_found;
                    self.scan_dirs_found = dirs_found;
                    self.scan_total_size = total_size;
                    self.scan_current_path = current_path;
                }
                ScanProgress::Error { path, message } => {
                    self.scan_error_count += 1;
                    if self.scan_errors.len() < MAX_SCAN_ERRORS {
                        self.scan_errors.push((path, message));
                    }
                }
                ScanProgress::Complete {
                    duration,
                    error_count,
                } => {
                    self.scan_error_count = error_count;
                    self.scan_duration = Some(duration);
                    self.finalize_scan();
                    return true;
                }
                ScanProgress::Cancelled => {
                    self.finalize_scan();
                    return true;
                }
            }
        }

        // During scanning, rebuild visible rows from the live tree when new
        // nodes have appeared.
        if self.phase == AppPhase::Scanning {
            if let Some(lt) = self.live_tree.clone() {
                let tree = lt.read();
                let current_len = tree.len();
                if current_len != self.live_tree_last_len && current_len > 0 {
                    self.live_tree_last_len = current_len;
                    self.rebuild_live_visible_rows(&tree);
                    repaint = true;
                }
            }
        }

        repaint
    }

    /// Take ownership of the live tree and flip to `Ready`.
    fn finalize_scan(&mut self) {
        self.phase = AppPhase::Ready;
        if let Some(lt) = self.live_tree.take() {
            // Try to unwrap the Arc; if still shared, clone.
            let tree = parking_lot::RwLock::into_inner(
                std::sync::Arc::try_unwrap(lt)
                    .unwrap_or_else(|arc| parking_lot::RwLock::new(arc.read().clone())),
            );
            self.build_initial_visible_rows(&tree);
            self.tree = Some(tree);
        }
        self.scan_handle = None;
    }

    // ── Visible rows ────────────────────────────────────────────────────

    /// Build the initial visible rows: projects expanded, their immediate
    /// children collapsed.
    fn build_initial_visible_rows(&mut self, tree: &ProjectTree) {
        self.visible_rows.clear();

        for root_idx in tree.roots_sorted() {
            if self.visible_rows.len() >= MAX_VISIBLE_ROWS {
                break;
            }
            self.visible_rows.push(VisibleRow {
                node_index: root_idx,
                depth: 0,
                is_expanded: true,
            });

            for child_idx in tree.children_sorted(root_idx) {
                if self.visible_rows.len() >= MAX_VISIBLE_ROWS {
                    break;
                }
                self.visible_rows.push(VisibleRow {
                    node_index: child_idx,
                    depth: 1,
                    is_expanded: false,
                });
            }
        }
    }

    /// Rebuild visible rows from the live tree during scanning, preserving
    /// expansion state. Projects are always expanded.
    fn rebuild_live_visible_rows(&mut self, tree: &ProjectTree) {
        let mut expanded: std::collections::HashSet<NodeIndex> = self
            .visible_rows
            .iter()
            .filter(|r| r.is_expanded)
            .map(|r| r.node_index)
            .collect();
        for &root_idx in &tree.roots {
            expanded.insert(root_idx);
        }

        self.visible_rows.clear();
        for root_idx in tree.roots_sorted() {
            self.build_live_rows_recursive(tree, root_idx, 0, &expanded);
        }
    }

    fn build_live_rows_recursive(
        &mut self,
        tree: &ProjectTree,
        node_idx: NodeIndex,
        depth: u16,
        expanded: &std::collections::HashSet<NodeIndex>,
    ) {
        if self.visible_rows.len() >= MAX_VISIBLE_ROWS {
            return;
        }

        let is_expanded = expanded.contains(&node_idx) && tree.node(node_idx).is_dir();

        self.visible_rows.push(VisibleRow {
            node_index: node_idx,
            depth,
            is_expanded,
        });

        if is_expanded {
            for child_idx in tree.children_sorted(node_idx) {
                self.build_live_rows_recursive(tree, child_idx, depth + 1, expanded);
            }
        }
    }

    /// Toggle expansion of the row at `row_index` in `visible_rows`.
    pub fn toggle_expand(&mut self, row_index: usize) {
        // Disjoint field borrows: the tree is read while visible_rows is
        // mutated, so the work happens in a free function.
        if let Some(ref tree) = self.tree {
            toggle_expand_inner(&mut self.visible_rows, row_index, tree);
        } else if let Some(ref lt) = self.live_tree {
            let tree = lt.read();
            toggle_expand_inner(&mut self.visible_rows, row_index, &tree);
        }
    }

    // ── Selection ───────────────────────────────────────────────────────

    /// Absolute path and directory flag of the selected node.
    pub fn selected_info(&self) -> Option<(PathBuf, bool)> {
        let idx = self.selected_node?;
        let tree = self.tree.as_ref()?;
        if idx.idx() >= tree.len() {
            return None;
        }
        let path = self.workspace.resolve(&tree.relative_path(idx));
        Some((path, tree.node(idx).is_dir()))
    }

    /// The directory new items land in: the selected directory itself, or
    /// the parent directory of a selected file.
    pub fn selected_dir_path(&self) -> Option<PathBuf> {
        let (path, is_dir) = self.selected_info()?;
        if is_dir {
            Some(path)
        } else {
            path.parent().map(Path::to_path_buf)
        }
    }

    /// The selected node's path, if it is a file.
    pub fn selected_file_path(&self) -> Option<PathBuf> {
        let (path, is_dir) = self.selected_info()?;
        (!is_dir).then_some(path)
    }

    // ── Operations ──────────────────────────────────────────────────────

    /// Open the name-input dialog for a new project.
    pub fn request_create_project(&mut self) {
        self.modal = Some(Modal::NameInput {
            target: NameTarget::Project,
            buffer: String::new(),
        });
    }

    /// Open the name-input dialog for a new folder under the selection.
    pub fn request_create_folder(&mut self) {
        if let Some(parent) = self.selected_dir_path() {
            self.modal = Some(Modal::NameInput {
                target: NameTarget::Folder { parent },
                buffer: String::new(),
            });
        }
    }

    /// Run the create operation a name-input dialog was opened for.
    ///
    /// A blank name closes the dialog without doing anything, like
    /// cancelling it.
    pub fn submit_name_input(&mut self) {
        let Some(Modal::NameInput { target, buffer }) = self.modal.take() else {
            return;
        };
        let name = buffer.trim().to_string();
        if name.is_empty() {
            return;
        }
        let result = match target {
            NameTarget::Project => self
                .workspace
                .create_project(&name)
                .map(|_| format!("Project '{name}' created"))
                .map_err(anyhow::Error::from),
            NameTarget::Folder { parent } => self
                .workspace
                .create_folder(&parent, &name)
                .map(|_| format!("Folder '{name}' added"))
                .map_err(anyhow::Error::from),
        };
        self.finish_op(result, true);
    }

    /// "Add File": pick an external file and copy it into the selection.
    pub fn add_file(&mut self) {
        let Some(dest) = self.selected_dir_path() else {
            return;
        };
        let Some(source) = self.dialogs.pick_import_file() else {
            return;
        };
        let result = self
            .workspace
            .import_file(&source, &dest)
            .map(|target| format!("File '{}' added", display_name(&target)))
            .map_err(anyhow::Error::from);
        self.finish_op(result, true);
    }

    /// "Add Directory": pick an external directory and copy it recursively
    /// into the selection.
    pub fn add_directory(&mut self) {
        let Some(dest) = self.selected_dir_path() else {
            return;
        };
        let Some(source) = self.dialogs.pick_import_directory() else {
            return;
        };
        let result = self
            .workspace
            .import_directory(&source, &dest)
            .map(|target| format!("Directory '{}' added", display_name(&target)))
            .map_err(anyhow::Error::from);
        self.finish_op(result, true);
    }

    /// "Retrieve File": copy the selected file out to a picked directory.
    ///
    /// The workspace is unchanged, so no refresh follows.
    pub fn retrieve_file(&mut self) {
        let Some(source) = self.selected_file_path() else {
            return;
        };
        let Some(target_dir) = self.dialogs.pick_export_directory() else {
            return;
        };
        let result = self
            .workspace
            .export_file(&source, &target_dir)
            .map(|target| format!("File retrieved to {}", target.display()))
            .map_err(anyhow::Error::from);
        self.finish_op(result, false);
    }

    /// Open the delete confirmation for the selection.
    pub fn request_delete_selected(&mut self) {
        if let Some((path, is_dir)) = self.selected_info() {
            self.modal = Some(Modal::ConfirmDelete { path, is_dir });
        }
    }

    /// Delete the item a confirmation dialog was opened for.
    pub fn confirm_delete(&mut self) {
        let Some(Modal::ConfirmDelete { path, .. }) = self.modal.take() else {
            return;
        };
        let name = display_name(&path);
        let result = self
            .workspace
            .remove(&path)
            .map(|_| format!("'{name}' deleted"))
            .map_err(anyhow::Error::from);
        self.finish_op(result, true);
    }

    /// Export the scanned tree to a CSV file picked via a save dialog.
    pub fn export_tree_csv(&mut self) {
        let Some(tree) = self.tree.as_ref() else {
            return;
        };
        let Some(path) = self
            .dialogs
            .save_csv_path(&export::default_export_filename())
        else {
            return;
        };
        let result = export::export_csv(tree, &path)
            .map(|_| format!("Exported {} items to {}", tree.len(), path.display()))
            .map_err(anyhow::Error::from);
        self.finish_op(result, false);
    }

    /// Extract a PDF's text and open the viewer window.
    pub fn open_pdf(&mut self, path: PathBuf) {
        match pdf::extract_text(&path) {
            Ok(content) => {
                let content = if content.trim().is_empty() {
                    String::from("(no extractable text)")
                } else {
                    content
                };
                self.modal = Some(Modal::PdfView {
                    title: display_name(&path),
                    content,
                });
            }
            Err(err) => {
                let err = anyhow::Error::from(err);
                self.open_error("PDF extraction failed", format!("{err:#}"));
            }
        }
    }

    /// Show an error dialog.
    pub fn open_error(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.modal = Some(Modal::Error {
            title: title.into(),
            message: message.into(),
        });
    }

    /// Record an operation outcome: status line on success (plus an
    /// optional re-scan), error dialog on failure.
    fn finish_op(&mut self, result: anyhow::Result<String>, refresh_after: bool) {
        match result {
            Ok(message) => {
                tracing::info!("{message}");
                self.status = message;
                if refresh_after {
                    self.refresh();
                }
            }
            Err(err) => {
                tracing::warn!("operation failed: {err:#}");
                self.open_error("Operation failed", format!("{err:#}"));
            }
        }
    }

    /// Flip the theme and persist the preference.
    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
        self.config.dark_mode = self.dark_mode;
        if let Err(e) = config::save_config(&self.config) {
            tracing::warn!("could not save config: {e:#}");
        }
    }
}

/// Toggle-expand implementation operating on the visible_rows vec directly.
///
/// Free function to avoid a `&mut self` / `&self.tree` borrow conflict.
fn toggle_expand_inner(visible_rows: &mut Vec<VisibleRow>, row_index: usize, tree: &ProjectTree) {
    let Some(row) = visible_rows.get(row_index) else {
        return;
    };
    let node = tree.node(row.node_index);

    if !node.is_dir() {
        return; // files can't be expanded
    }

    if row.is_expanded {
        // COLLAPSE: remove the consecutive run of deeper rows.
        let parent_depth = row.depth;
        let remove_start = row_index + 1;
        let mut remove_end = remove_start;
        while remove_end < visible_rows.len() && visible_rows[remove_end].depth > parent_depth {
            remove_end += 1;
        }
        visible_rows.drain(remove_start..remove_end);
        visible_rows[row_index].is_expanded = false;
    } else {
        // EXPAND: insert sorted children immediately after this row,
        // respecting the row cap.
        let node_idx = row.node_index;
        let child_depth = row.depth + 1;
        let insert_pos = row_index + 1;
        let headroom = MAX_VISIBLE_ROWS.saturating_sub(visible_rows.len());

        let new_rows: Vec<VisibleRow> = tree
            .children_sorted(node_idx)
            .into_iter()
            .take(headroom)
            .map(|child_idx| VisibleRow {
                node_index: child_idx,
                depth: child_depth,
                is_expanded: false,
            })
            .collect();

        visible_rows.splice(insert_pos..insert_pos, new_rows);
        visible_rows[row_index].is_expanded = true;
    }
}

/// File-name portion of a path for status messages.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
