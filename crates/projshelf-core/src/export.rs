/// CSV export of a scanned workspace tree.
///
/// One row per node, written in arena order (parents before children):
/// workspace-relative path, type, size in bytes, and descendant file
/// count for directories.
use crate::model::ProjectTree;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {1}: {0}")]
    Csv(#[source] csv::Error, PathBuf),
}

/// Suggested file name for an export save dialog.
pub fn default_export_filename() -> String {
    format!(
        "projshelf-{}.csv",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    )
}

/// Write the tree to `path` as CSV.
pub fn export_csv(tree: &ProjectTree, path: &Path) -> Result<(), ExportError> {
    let wrap = |e: csv::Error| ExportError::Csv(e, path.to_path_buf());

    let mut writer = csv::Writer::from_path(path).map_err(wrap)?;
    writer
        .write_record(["Path", "Type", "Size (bytes)", "Files"])
        .map_err(wrap)?;

    for (i, node) in tree.nodes.iter().enumerate() {
        let rel = tree.relative_path(crate::model::NodeIndex::new(i));
        let path = rel.display().to_string();
        let size = node.size.to_string();
        let files = if node.is_dir() {
            node.file_count.to_string()
        } else {
            String::new()
        };
        writer
            .write_record([path.as_str(), node.kind.label(), size.as_str(), files.as_str()])
            .map_err(wrap)?;
    }

    writer.flush().map_err(|e| {
        ExportError::Csv(csv::Error::from(e), path.to_path_buf())
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, NodeKind};
    use compact_str::CompactString;

    #[test]
    fn export_writes_one_row_per_node() {
        let mut tree = ProjectTree::with_capacity(3);
        let project = tree.add_project(CompactString::new("thesis"));
        let f = tree.add_node(Node::new_file(
            CompactString::new("draft.md"),
            42,
            Some(project),
        ));
        tree.add_child(project, f);
        tree.aggregate();

        let tmp = tempfile::TempDir::new().expect("temp dir");
        let out = tmp.path().join("export.csv");
        export_csv(&tree, &out).expect("export");

        let contents = std::fs::read_to_string(&out).expect("read back");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3, "header + 2 nodes");
        assert_eq!(lines[0], "Path,Type,Size (bytes),Files");
        assert!(lines.iter().any(|l| l.contains("Project") && l.contains("42")));
        assert!(lines.iter().any(|l| l.contains("draft.md")));
    }

    #[test]
    fn default_filename_is_csv() {
        let name = default_export_filename();
        assert!(name.starts_with("projshelf-"));
        assert!(name.ends_with(".csv"));
    }
}
