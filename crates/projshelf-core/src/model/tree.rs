/// Arena-backed workspace tree with O(n) bottom-up size aggregation.
///
/// All nodes live in a single `Vec<Node>`. Relationships between nodes use
/// `NodeIndex` (a thin `u32` wrapper) rather than heap pointers, giving
/// cache-friendly traversal. One root per project directory; the workspace
/// root itself is not a node.
use super::node::{Node, NodeIndex, NodeKind};
use compact_str::CompactString;
use std::path::PathBuf;

/// The complete workspace tree produced by a scan.
#[derive(Debug, Clone, Default)]
pub struct ProjectTree {
    /// Arena: every node in a flat vector, parents before children.
    pub nodes: Vec<Node>,

    /// Root node indices — one per project directory.
    pub roots: Vec<NodeIndex>,

    /// Total size in bytes across all projects.
    pub total_size: u64,
}

impl ProjectTree {
    /// Create an empty tree with pre-allocated capacity.
    pub fn with_capacity(estimated_nodes: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(estimated_nodes),
            roots: Vec::new(),
            total_size: 0,
        }
    }

    /// Allocate a new node in the arena and return its index.
    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        let idx = NodeIndex::new(self.nodes.len());
        self.nodes.push(node);
        idx
    }

    /// Add a project root to the tree.
    pub fn add_project(&mut self, name: CompactString) -> NodeIndex {
        let node = Node::new_dir(name, NodeKind::Project, None);
        let idx = self.add_node(node);
        self.roots.push(idx);
        idx
    }

    /// Attach `child` as a child of `parent`, prepending to the sibling list.
    ///
    /// O(1) — new children are inserted at the head of the linked list.
    /// Display order is handled by [`children_sorted`](Self::children_sorted).
    pub fn add_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        let old_first = self.nodes[parent.idx()].first_child;
        self.nodes[child.idx()].next_sibling = old_first;
        self.nodes[child.idx()].parent = Some(parent);
        self.nodes[parent.idx()].first_child = Some(child);
    }

    /// Compute directory sizes and file counts in a single bottom-up pass.
    ///
    /// Because children are always inserted after their parent in the arena
    /// (scan order is parent-first), iterating in *reverse* guarantees that
    /// every child is processed before its parent. O(n), no recursion.
    ///
    /// Safe to call repeatedly (e.g. while a scan is still inserting nodes) —
    /// directory totals are reset before each pass.
    pub fn aggregate(&mut self) {
        for node in self.nodes.iter_mut() {
            if node.is_dir() {
                node.size = 0;
                node.file_count = 0;
            }
        }

        // Reverse pass: children before parents.
        for i in (0..self.nodes.len()).rev() {
            let (size, files) = {
                let node = &self.nodes[i];
                if node.is_dir() {
                    (node.size, node.file_count)
                } else {
                    (node.size, 1)
                }
            };
            if let Some(parent_idx) = self.nodes[i].parent {
                self.nodes[parent_idx.idx()].size += size;
                self.nodes[parent_idx.idx()].file_count += files;
            }
        }

        self.total_size = self.roots.iter().map(|r| self.nodes[r.idx()].size).sum();
    }

    /// Reconstruct the path of a node relative to the workspace root.
    pub fn relative_path(&self, index: NodeIndex) -> PathBuf {
        let mut segments = Vec::new();
        let mut current = Some(index);
        while let Some(idx) = current {
            segments.push(self.nodes[idx.idx()].name.as_str());
            current = self.nodes[idx.idx()].parent;
        }
        segments.iter().rev().collect()
    }

    /// Direct children of a node, directories first, then by name.
    ///
    /// Name comparison is case-insensitive so the display order matches what
    /// users expect from a file manager.
    pub fn children_sorted(&self, parent: NodeIndex) -> Vec<NodeIndex> {
        let mut children = self.children(parent);
        children.sort_unstable_by(|a, b| {
            let a_node = &self.nodes[a.idx()];
            let b_node = &self.nodes[b.idx()];
            b_node
                .is_dir()
                .cmp(&a_node.is_dir())
                .then_with(|| {
                    a_node
                        .name
                        .to_lowercase()
                        .cmp(&b_node.name.to_lowercase())
                })
        });
        children
    }

    /// Direct children of a node in insertion-list order.
    pub fn children(&self, parent: NodeIndex) -> Vec<NodeIndex> {
        let mut children = Vec::new();
        let mut child = self.nodes[parent.idx()].first_child;
        while let Some(idx) = child {
            children.push(idx);
            child = self.nodes[idx.idx()].next_sibling;
        }
        children
    }

    /// Project roots sorted by name, for stable display.
    pub fn roots_sorted(&self) -> Vec<NodeIndex> {
        let mut roots = self.roots.clone();
        roots.sort_unstable_by(|a, b| {
            self.nodes[a.idx()]
                .name
                .to_lowercase()
                .cmp(&self.nodes[b.idx()].name.to_lowercase())
        });
        roots
    }

    /// Get the node at the given index.
    #[inline]
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.idx()]
    }

    /// Total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree contains no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(tree: &mut ProjectTree, parent: NodeIndex, name: &str, size: u64) -> NodeIndex {
        let idx = tree.add_node(Node::new_file(CompactString::new(name), size, Some(parent)));
        tree.add_child(parent, idx);
        idx
    }

    fn folder(tree: &mut ProjectTree, parent: NodeIndex, name: &str) -> NodeIndex {
        let idx = tree.add_node(Node::new_dir(
            CompactString::new(name),
            NodeKind::Folder,
            Some(parent),
        ));
        tree.add_child(parent, idx);
        idx
    }

    #[test]
    fn aggregation_rolls_up_sizes_and_counts() {
        let mut tree = ProjectTree::with_capacity(10);

        // thesis/ -> notes/ -> (draft.md: 100, refs.bib: 200)
        let project = tree.add_project(CompactString::new("thesis"));
        let notes = folder(&mut tree, project, "notes");
        file(&mut tree, notes, "draft.md", 100);
        file(&mut tree, notes, "refs.bib", 200);

        tree.aggregate();

        assert_eq!(tree.node(notes).size, 300);
        assert_eq!(tree.node(project).size, 300);
        assert_eq!(tree.node(notes).file_count, 2);
        assert_eq!(tree.node(project).file_count, 2);
        assert_eq!(tree.total_size, 300);
    }

    #[test]
    fn aggregation_spans_multiple_projects() {
        let mut tree = ProjectTree::with_capacity(6);
        let a = tree.add_project(CompactString::new("alpha"));
        file(&mut tree, a, "a.txt", 10);
        let b = tree.add_project(CompactString::new("beta"));
        file(&mut tree, b, "b.txt", 20);

        tree.aggregate();

        assert_eq!(tree.total_size, 30);
        assert_eq!(tree.roots.len(), 2);
    }

    #[test]
    fn relative_path_joins_segments() {
        let mut tree = ProjectTree::with_capacity(4);
        let project = tree.add_project(CompactString::new("thesis"));
        let notes = folder(&mut tree, project, "notes");
        let draft = file(&mut tree, notes, "draft.md", 50);

        assert_eq!(
            tree.relative_path(draft),
            PathBuf::from("thesis").join("notes").join("draft.md")
        );
        assert_eq!(tree.relative_path(project), PathBuf::from("thesis"));
    }

    #[test]
    fn children_sorted_puts_directories_first_then_names() {
        let mut tree = ProjectTree::with_capacity(5);
        let project = tree.add_project(CompactString::new("demo"));

        let zebra = file(&mut tree, project, "zebra.txt", 1);
        let apple = file(&mut tree, project, "Apple.txt", 1);
        let sub = folder(&mut tree, project, "sub");

        let sorted = tree.children_sorted(project);
        assert_eq!(sorted, vec![sub, apple, zebra]);
    }

    #[test]
    fn empty_tree_aggregates_to_zero() {
        let mut tree = ProjectTree::default();
        tree.aggregate();
        assert_eq!(tree.total_size, 0);
        assert!(tree.is_empty());
    }
}
