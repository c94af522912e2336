/// End-to-end workspace operation tests.
///
/// These exercise the real `Workspace` operations against a real temporary
/// filesystem — no mocking. Each operation is a thin wrapper around OS
/// calls, so the tests assert on what actually lands on disk.
use projshelf_core::workspace::{Workspace, WorkspaceError};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn write_bytes(path: &Path, n: usize) {
    let mut f = fs::File::create(path).unwrap();
    f.write_all(&vec![0u8; n]).unwrap();
}

/// A workspace in a fresh temp directory, plus a sibling "external" dir
/// for import/export sources and targets.
fn setup() -> (TempDir, Workspace, std::path::PathBuf) {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let root = tmp.path().join("projects");
    let external = tmp.path().join("external");
    fs::create_dir_all(&external).unwrap();
    let ws = Workspace::open(&root).expect("open workspace");
    (tmp, ws, external)
}

// ── Open ─────────────────────────────────────────────────────────────────────

/// Opening a workspace creates the root directory if it is missing.
#[test]
fn open_creates_missing_root() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("projects");
    assert!(!root.exists());

    let ws = Workspace::open(&root).expect("open");
    assert!(root.is_dir());
    assert_eq!(ws.root(), root);
}

/// Opening an existing root is a no-op.
#[test]
fn open_existing_root_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("projects");
    Workspace::open(&root).expect("first open");
    Workspace::open(&root).expect("second open");
    assert!(root.is_dir());
}

// ── Create ───────────────────────────────────────────────────────────────────

/// After creating a project named X, a directory X exists under the root.
#[test]
fn create_project_makes_directory() {
    let (_tmp, ws, _) = setup();
    let path = ws.create_project("thesis").expect("create");
    assert_eq!(path, ws.root().join("thesis"));
    assert!(path.is_dir());
}

/// Creating a project that already exists succeeds (mkdir -p semantics).
#[test]
fn create_project_twice_is_ok() {
    let (_tmp, ws, _) = setup();
    ws.create_project("thesis").expect("first");
    ws.create_project("thesis").expect("second");
}

#[test]
fn create_project_rejects_bad_names() {
    let (_tmp, ws, _) = setup();
    for bad in ["", "..", "a/b", "a\\b"] {
        assert!(
            matches!(
                ws.create_project(bad),
                Err(WorkspaceError::InvalidName(_))
            ),
            "{bad:?} must be rejected"
        );
    }
}

#[test]
fn create_folder_under_project() {
    let (_tmp, ws, _) = setup();
    let project = ws.create_project("thesis").expect("project");
    let folder = ws.create_folder(&project, "notes").expect("folder");
    assert!(folder.is_dir());
    assert_eq!(folder, project.join("notes"));
}

/// Folders cannot be created under paths outside the workspace.
#[test]
fn create_folder_outside_root_is_rejected() {
    let (tmp, ws, _) = setup();
    let err = ws
        .create_folder(tmp.path(), "escape")
        .expect_err("must fail");
    assert!(matches!(err, WorkspaceError::OutsideRoot(_)));
}

// ── Import ───────────────────────────────────────────────────────────────────

#[test]
fn import_file_copies_into_project() {
    let (_tmp, ws, external) = setup();
    let project = ws.create_project("thesis").unwrap();
    let source = external.join("data.bin");
    write_bytes(&source, 128);

    let target = ws.import_file(&source, &project).expect("import");
    assert_eq!(target, project.join("data.bin"));
    assert_eq!(fs::metadata(&target).unwrap().len(), 128);
    // The source is copied, not moved.
    assert!(source.exists());
}

/// A name collision renames the copy with a `copy_of_` prefix.
#[test]
fn import_file_collision_uses_copy_of_prefix() {
    let (_tmp, ws, external) = setup();
    let project = ws.create_project("thesis").unwrap();
    let source = external.join("data.bin");
    write_bytes(&source, 64);

    write_bytes(&project.join("data.bin"), 1);
    let target = ws.import_file(&source, &project).expect("import");

    assert_eq!(target, project.join("copy_of_data.bin"));
    assert_eq!(fs::metadata(&target).unwrap().len(), 64);
    // The original in the project is untouched.
    assert_eq!(fs::metadata(project.join("data.bin")).unwrap().len(), 1);
}

/// A second collision (both the name and its `copy_of_` variant taken)
/// fails instead of overwriting.
#[test]
fn import_file_double_collision_errors() {
    let (_tmp, ws, external) = setup();
    let project = ws.create_project("thesis").unwrap();
    let source = external.join("data.bin");
    write_bytes(&source, 64);

    write_bytes(&project.join("data.bin"), 1);
    write_bytes(&project.join("copy_of_data.bin"), 1);

    let err = ws.import_file(&source, &project).expect_err("must fail");
    assert!(matches!(err, WorkspaceError::DestinationExists(_)));
}

#[test]
fn import_file_rejects_directories() {
    let (_tmp, ws, external) = setup();
    let project = ws.create_project("thesis").unwrap();
    let err = ws.import_file(&external, &project).expect_err("must fail");
    assert!(matches!(err, WorkspaceError::NotAFile(_)));
}

#[test]
fn import_directory_copies_recursively() {
    let (_tmp, ws, external) = setup();
    let project = ws.create_project("thesis").unwrap();

    // external/dataset/{a.txt, sub/b.txt}
    let dataset = external.join("dataset");
    fs::create_dir_all(dataset.join("sub")).unwrap();
    write_bytes(&dataset.join("a.txt"), 10);
    write_bytes(&dataset.join("sub").join("b.txt"), 20);

    let target = ws.import_directory(&dataset, &project).expect("import");
    assert_eq!(target, project.join("dataset"));
    assert!(target.join("a.txt").is_file());
    assert!(target.join("sub").join("b.txt").is_file());
}

#[test]
fn import_directory_collision_uses_copy_of_prefix() {
    let (_tmp, ws, external) = setup();
    let project = ws.create_project("thesis").unwrap();

    let dataset = external.join("dataset");
    fs::create_dir_all(&dataset).unwrap();
    write_bytes(&dataset.join("a.txt"), 10);

    fs::create_dir_all(project.join("dataset")).unwrap();
    let target = ws.import_directory(&dataset, &project).expect("import");

    assert_eq!(target, project.join("copy_of_dataset"));
    assert!(target.join("a.txt").is_file());
}

// ── Export ───────────────────────────────────────────────────────────────────

#[test]
fn export_file_copies_out_of_workspace() {
    let (_tmp, ws, external) = setup();
    let project = ws.create_project("thesis").unwrap();
    let inside = project.join("draft.md");
    write_bytes(&inside, 256);

    let out = ws.export_file(&inside, &external).expect("export");
    assert_eq!(out, external.join("draft.md"));
    assert_eq!(fs::metadata(&out).unwrap().len(), 256);
    // The workspace copy stays in place.
    assert!(inside.exists());
}

#[test]
fn export_rejects_directories_and_foreign_paths() {
    let (_tmp, ws, external) = setup();
    let project = ws.create_project("thesis").unwrap();

    let err = ws.export_file(&project, &external).expect_err("dir");
    assert!(matches!(err, WorkspaceError::NotAFile(_)));

    let foreign = external.join("foreign.txt");
    write_bytes(&foreign, 8);
    let err = ws.export_file(&foreign, &external).expect_err("foreign");
    assert!(matches!(err, WorkspaceError::OutsideRoot(_)));
}

// ── Remove ───────────────────────────────────────────────────────────────────

/// After deleting an item, it no longer exists on disk.
#[test]
fn remove_file_and_directory() {
    let (_tmp, ws, _) = setup();
    let project = ws.create_project("thesis").unwrap();
    let file = project.join("draft.md");
    write_bytes(&file, 32);

    ws.remove(&file).expect("remove file");
    assert!(!file.exists());

    ws.remove(&project).expect("remove project");
    assert!(!project.exists());
    assert!(ws.root().is_dir(), "root must survive");
}

#[test]
fn remove_refuses_root_and_outside_paths() {
    let (tmp, ws, _) = setup();
    let root = ws.root().to_path_buf();
    assert!(ws.remove(&root).is_err());
    assert!(ws.remove(tmp.path()).is_err());
    assert!(root.is_dir());
    assert!(tmp.path().is_dir());
}

#[test]
fn remove_missing_path_surfaces_os_error() {
    let (_tmp, ws, _) = setup();
    let missing = ws.root().join("ghost");
    let err = ws.remove(&missing).expect_err("must fail");
    assert!(matches!(err, WorkspaceError::Io(..)));
}
