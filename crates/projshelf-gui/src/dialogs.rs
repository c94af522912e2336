//! An abstraction layer for native file dialogs to enable testing.
//!
//! State-machine tests construct `AppState` with a stub implementation so
//! no OS dialog window ever opens in a test run.

use std::path::{Path, PathBuf};

/// Common interface for the file and folder pickers the app needs.
pub trait DialogService {
    /// Select a single external file to add to the workspace.
    fn pick_import_file(&self) -> Option<PathBuf>;

    /// Select a single external directory to add to the workspace.
    fn pick_import_directory(&self) -> Option<PathBuf>;

    /// Select the external directory a retrieved file is copied into.
    fn pick_export_directory(&self) -> Option<PathBuf>;

    /// Select a save location for a CSV export.
    fn save_csv_path(&self, suggested_name: &str) -> Option<PathBuf>;
}

/// Production implementation backed by `rfd` native OS dialogs.
pub struct NativeDialogs;

impl DialogService for NativeDialogs {
    fn pick_import_file(&self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Select File to Add")
            .pick_file()
    }

    fn pick_import_directory(&self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Select Directory to Add")
            .pick_folder()
    }

    fn pick_export_directory(&self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Select Target Directory")
            .pick_folder()
    }

    fn save_csv_path(&self, suggested_name: &str) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name(suggested_name)
            .save_file()
    }
}

/// Open a directory in the platform file manager.
pub fn reveal_in_file_manager(dir: &Path) {
    if let Err(e) = open::that(dir) {
        tracing::warn!("could not open {} in file manager: {e}", dir.display());
    }
}
