/// ProjShelf Core — workspace operations, scanning, and data model.
///
/// This crate contains all business logic with zero UI dependencies.
///
/// # Modules
///
/// - [`model`] — Arena-allocated workspace tree and supporting types.
/// - [`workspace`] — The mutating operations: create, import, export, remove.
/// - [`scanner`] — Full re-walk of the workspace with progress reporting.
/// - [`analysis`] — Directory summaries for the details panel.
/// - [`pdf`] — PDF text extraction for the viewer window.
/// - [`export`] — CSV export of a scanned tree.
/// - [`config`] — JSON preferences.
pub mod analysis;
pub mod config;
pub mod export;
pub mod model;
pub mod pdf;
pub mod scanner;
pub mod workspace;

pub use workspace::{Workspace, WorkspaceError};
