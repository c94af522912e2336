/// Workspace operations — the mutating half of ProjShelf.
///
/// Every operation is a direct, synchronous call into the OS filesystem
/// APIs (make directory, copy file, copy tree, remove). There is no undo,
/// no retry, and no recovery beyond what the OS calls themselves raise;
/// callers refresh the tree after a successful mutation.
///
/// All targets are validated to stay under the workspace root before any
/// OS call is made.
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::info;

/// Default workspace root, relative to the working directory.
pub const DEFAULT_ROOT: &str = "projects";

/// Prefix applied when an import collides with an existing entry.
const COLLISION_PREFIX: &str = "copy_of_";

/// Errors raised by workspace operations.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("I/O error for {1}: {0}")]
    Io(#[source] io::Error, PathBuf),

    #[error("failed to copy directory {1}: {0}")]
    CopyTree(#[source] fs_extra::error::Error, PathBuf),

    #[error("invalid name {0:?}: must be a single path component")]
    InvalidName(String),

    #[error("{0} already exists")]
    DestinationExists(PathBuf),

    #[error("{0} is outside the workspace root")]
    OutsideRoot(PathBuf),

    #[error("{0} is not a file")]
    NotAFile(PathBuf),

    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
}

impl WorkspaceError {
    fn io(err: io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io(err, path.into())
    }
}

/// A project workspace rooted at a single base directory.
///
/// Projects are the top-level directories under the root; everything
/// beneath them is plain folders and files. The workspace maintains no
/// state of its own beyond the root path — the filesystem is the only
/// source of truth.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Open a workspace at `root`, creating the directory if it is missing.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, WorkspaceError> {
        let root = root.into();
        if !root.is_dir() {
            fs::create_dir_all(&root).map_err(|e| WorkspaceError::io(e, &root))?;
            info!("created workspace root {}", root.display());
        }
        Ok(Self { root })
    }

    /// The workspace base directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a tree-relative path.
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// Create a new project directory directly under the root.
    pub fn create_project(&self, name: &str) -> Result<PathBuf, WorkspaceError> {
        let name = validate_name(name)?;
        let path = self.root.join(name);
        fs::create_dir_all(&path).map_err(|e| WorkspaceError::io(e, &path))?;
        info!("created project {}", path.display());
        Ok(path)
    }

    /// Create a folder under an existing directory of the workspace.
    pub fn create_folder(&self, parent: &Path, name: &str) -> Result<PathBuf, WorkspaceError> {
        let name = validate_name(name)?;
        self.ensure_contained(parent)?;
        if !parent.is_dir() {
            return Err(WorkspaceError::NotADirectory(parent.to_path_buf()));
        }
        let path = parent.join(name);
        fs::create_dir_all(&path).map_err(|e| WorkspaceError::io(e, &path))?;
        info!("created folder {}", path.display());
        Ok(path)
    }

    /// Copy an external file into a workspace directory.
    ///
    /// On a name collision the copy is written as `copy_of_<name>`; if that
    /// name is also taken the operation fails rather than overwrite.
    pub fn import_file(&self, source: &Path, dest_dir: &Path) -> Result<PathBuf, WorkspaceError> {
        self.ensure_contained(dest_dir)?;
        if !source.is_file() {
            return Err(WorkspaceError::NotAFile(source.to_path_buf()));
        }
        let target = self.collision_target(source, dest_dir)?;
        fs::copy(source, &target).map_err(|e| WorkspaceError::io(e, &target))?;
        info!("imported {} -> {}", source.display(), target.display());
        Ok(target)
    }

    /// Recursively copy an external directory into a workspace directory.
    ///
    /// Collision handling matches [`import_file`](Self::import_file).
    pub fn import_directory(
        &self,
        source: &Path,
        dest_dir: &Path,
    ) -> Result<PathBuf, WorkspaceError> {
        self.ensure_contained(dest_dir)?;
        if !source.is_dir() {
            return Err(WorkspaceError::NotADirectory(source.to_path_buf()));
        }
        let target = self.collision_target(source, dest_dir)?;
        let options = fs_extra::dir::CopyOptions {
            copy_inside: true,
            ..Default::default()
        };
        fs_extra::dir::copy(source, &target, &options)
            .map_err(|e| WorkspaceError::CopyTree(e, target.clone()))?;
        info!("imported {} -> {}", source.display(), target.display());
        Ok(target)
    }

    /// "Retrieve File": copy a workspace file out to an external directory.
    ///
    /// An existing file of the same name in `target_dir` is overwritten,
    /// exactly as a plain OS copy would.
    pub fn export_file(
        &self,
        source: &Path,
        target_dir: &Path,
    ) -> Result<PathBuf, WorkspaceError> {
        self.ensure_contained(source)?;
        if !source.is_file() {
            return Err(WorkspaceError::NotAFile(source.to_path_buf()));
        }
        let name = source
            .file_name()
            .ok_or_else(|| WorkspaceError::NotAFile(source.to_path_buf()))?;
        let target = target_dir.join(name);
        fs::copy(source, &target).map_err(|e| WorkspaceError::io(e, &target))?;
        info!("retrieved {} -> {}", source.display(), target.display());
        Ok(target)
    }

    /// Delete an item — recursive for directories, unlink for files.
    ///
    /// The workspace root itself cannot be removed.
    pub fn remove(&self, path: &Path) -> Result<(), WorkspaceError> {
        self.ensure_contained(path)?;
        if path == self.root {
            return Err(WorkspaceError::OutsideRoot(path.to_path_buf()));
        }
        if path.is_dir() {
            fs::remove_dir_all(path).map_err(|e| WorkspaceError::io(e, path))?;
        } else {
            fs::remove_file(path).map_err(|e| WorkspaceError::io(e, path))?;
        }
        info!("removed {}", path.display());
        Ok(())
    }

    /// Resolve the destination for an import, applying the `copy_of_`
    /// rename on collision.
    fn collision_target(
        &self,
        source: &Path,
        dest_dir: &Path,
    ) -> Result<PathBuf, WorkspaceError> {
        let name = source
            .file_name()
            .ok_or_else(|| WorkspaceError::InvalidName(source.display().to_string()))?;
        let target = dest_dir.join(name);
        if !target.exists() {
            return Ok(target);
        }
        let renamed = dest_dir.join(format!("{COLLISION_PREFIX}{}", name.to_string_lossy()));
        if renamed.exists() {
            return Err(WorkspaceError::DestinationExists(renamed));
        }
        Ok(renamed)
    }

    /// Reject paths that escape the workspace root.
    ///
    /// The check is lexical: the path must start with the root and contain
    /// no `..` components past it. Paths handed to operations come from the
    /// scanned tree, so this is a guard against bugs, not an ACL.
    fn ensure_contained(&self, path: &Path) -> Result<(), WorkspaceError> {
        let outside = || WorkspaceError::OutsideRoot(path.to_path_buf());
        let tail = path.strip_prefix(&self.root).map_err(|_| outside())?;
        if tail
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(outside());
        }
        Ok(())
    }
}

/// Validate a user-supplied project or folder name.
///
/// Names must be a single, non-empty path component: no separators, no
/// `.`/`..`, no leading/trailing whitespace.
pub fn validate_name(name: &str) -> Result<&str, WorkspaceError> {
    let invalid = || WorkspaceError::InvalidName(name.to_string());
    if name.trim() != name {
        return Err(invalid());
    }
    if name.is_empty() || name == "." || name == ".." {
        return Err(invalid());
    }
    if name.contains(['/', '\\']) || name.contains('\0') {
        return Err(invalid());
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_name_accepts_plain_components() {
        assert!(validate_name("thesis").is_ok());
        assert!(validate_name("my project 2").is_ok());
        assert!(validate_name("notes.v2").is_ok());
    }

    #[test]
    fn validate_name_rejects_separators_and_dots() {
        for bad in ["", ".", "..", "a/b", "a\\b", " padded", "padded "] {
            assert!(validate_name(bad).is_err(), "{bad:?} must be rejected");
        }
    }
}
