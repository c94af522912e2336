/// Directory summaries for the details panel.
///
/// Computes file count, total size, and the set of distinct file
/// extensions beneath a directory node. Everything is read from the
/// scanned tree — no filesystem access.
use crate::model::{NodeIndex, ProjectTree};
use std::collections::BTreeSet;

/// Aggregate details for a project or folder.
#[derive(Debug, Default, Clone)]
pub struct DirSummary {
    pub file_count: u64,
    pub total_size: u64,
    /// Distinct file extensions, lowercased. Files without a dot
    /// contribute their whole name, matching a naive `rsplit('.')`.
    pub extensions: BTreeSet<String>,
}

/// Summarize the subtree rooted at `index`.
///
/// Sizes and counts come from the aggregation pass; only the extension
/// set requires walking the subtree, done iteratively with an explicit
/// stack.
pub fn summarize(tree: &ProjectTree, index: NodeIndex) -> DirSummary {
    let root = tree.node(index);
    let mut summary = DirSummary {
        file_count: root.file_count,
        total_size: root.size,
        extensions: BTreeSet::new(),
    };

    let mut stack: Vec<NodeIndex> = vec![index];
    while let Some(idx) = stack.pop() {
        let node = tree.node(idx);
        if node.is_dir() {
            let mut child = node.first_child;
            while let Some(c) = child {
                stack.push(c);
                child = tree.node(c).next_sibling;
            }
        } else {
            let ext = node.name.rsplit('.').next().unwrap_or("");
            if !ext.is_empty() {
                summary.extensions.insert(ext.to_ascii_lowercase());
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, NodeKind};
    use compact_str::CompactString;

    fn sample_tree() -> (ProjectTree, NodeIndex) {
        let mut tree = ProjectTree::with_capacity(8);
        let project = tree.add_project(CompactString::new("thesis"));

        let notes = tree.add_node(Node::new_dir(
            CompactString::new("notes"),
            NodeKind::Folder,
            Some(project),
        ));
        tree.add_child(project, notes);

        for (parent, name, size) in [
            (notes, "draft.md", 100),
            (notes, "refs.PDF", 200),
            (project, "readme.md", 50),
        ] {
            let f = tree.add_node(Node::new_file(
                CompactString::new(name),
                size,
                Some(parent),
            ));
            tree.add_child(parent, f);
        }

        tree.aggregate();
        (tree, project)
    }

    #[test]
    fn summary_counts_files_and_sizes() {
        let (tree, project) = sample_tree();
        let summary = summarize(&tree, project);
        assert_eq!(summary.file_count, 3);
        assert_eq!(summary.total_size, 350);
    }

    #[test]
    fn summary_collects_lowercased_extensions() {
        let (tree, project) = sample_tree();
        let summary = summarize(&tree, project);
        let exts: Vec<&str> = summary.extensions.iter().map(String::as_str).collect();
        assert_eq!(exts, vec!["md", "pdf"]);
    }

    #[test]
    fn summary_of_subfolder_is_scoped() {
        let (tree, project) = sample_tree();
        let notes = tree
            .children(project)
            .into_iter()
            .find(|&c| tree.node(c).is_dir())
            .expect("folder child");

        let summary = summarize(&tree, notes);
        assert_eq!(summary.file_count, 2);
        assert_eq!(summary.total_size, 300);
    }

    #[test]
    fn summary_of_empty_project() {
        let mut tree = ProjectTree::with_capacity(1);
        let project = tree.add_project(CompactString::new("empty"));
        tree.aggregate();

        let summary = summarize(&tree, project);
        assert_eq!(summary.file_count, 0);
        assert_eq!(summary.total_size, 0);
        assert!(summary.extensions.is_empty());
    }
}
