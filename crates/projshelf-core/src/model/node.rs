/// A single node in the arena-allocated workspace tree.
///
/// Nodes are stored in a flat `Vec<Node>` for cache-friendly traversal.
/// Parent-child relationships use indices rather than pointers, which also
/// makes the tree trivially cloneable with no reference-counting overhead.
use compact_str::CompactString;
use std::time::SystemTime;

/// Lightweight index into the arena `Vec<Node>`.
///
/// Uses `u32` to keep nodes small — supports up to ~4 billion nodes,
/// far more than any workspace will ever hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Create a new `NodeIndex` from a `usize`.
    #[inline]
    pub fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize, "NodeIndex overflow");
        Self(index as u32)
    }

    /// Return the index as a `usize` for Vec indexing.
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// What a node represents in the workspace hierarchy.
///
/// Top-level directories under the workspace root are projects; every
/// directory beneath them is a plain folder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Project,
    Folder,
    File,
}

impl NodeKind {
    /// Label shown in the tree's Type column.
    pub fn label(self) -> &'static str {
        match self {
            Self::Project => "Project",
            Self::Folder => "Folder",
            Self::File => "File",
        }
    }

    #[inline]
    pub fn is_dir(self) -> bool {
        !matches!(self, Self::File)
    }
}

/// A project, folder, or file in the workspace tree.
///
/// Children form a singly-linked list via `first_child` / `next_sibling`
/// so that no per-node `Vec<NodeIndex>` allocation is needed.
#[derive(Debug, Clone)]
pub struct Node {
    /// Entry name only (NOT the full path).
    /// Full paths are reconstructed on demand by walking up via `parent`.
    pub name: CompactString,

    /// What this node represents.
    pub kind: NodeKind,

    /// File size in bytes. For directories this is the sum of all
    /// descendant file sizes, computed in a bottom-up pass after scanning.
    pub size: u64,

    /// Index of the parent node. `None` for project roots.
    pub parent: Option<NodeIndex>,

    /// First child (directories only).
    pub first_child: Option<NodeIndex>,

    /// Next sibling under the same parent.
    pub next_sibling: Option<NodeIndex>,

    /// Total number of descendant *files* (not directories).
    pub file_count: u64,

    /// Last-modified timestamp (files only).
    pub modified: Option<SystemTime>,

    /// `true` if this entry could not be read (e.g. access denied).
    /// The node stays in the tree so users can see where errors occurred.
    pub is_error: bool,
}

impl Node {
    /// Create a new file node with the given name and size.
    pub fn new_file(name: CompactString, size: u64, parent: Option<NodeIndex>) -> Self {
        Self {
            name,
            kind: NodeKind::File,
            size,
            parent,
            first_child: None,
            next_sibling: None,
            file_count: 0,
            modified: None,
            is_error: false,
        }
    }

    /// Create a new directory node of the given kind.
    pub fn new_dir(name: CompactString, kind: NodeKind, parent: Option<NodeIndex>) -> Self {
        debug_assert!(kind.is_dir());
        Self {
            name,
            kind,
            size: 0,
            parent,
            first_child: None,
            next_sibling: None,
            file_count: 0,
            modified: None,
            is_error: false,
        }
    }

    /// Create an error placeholder node (e.g. an unreadable directory).
    pub fn new_error(name: CompactString, kind: NodeKind, parent: Option<NodeIndex>) -> Self {
        Self {
            name,
            kind,
            size: 0,
            parent,
            first_child: None,
            next_sibling: None,
            file_count: 0,
            modified: None,
            is_error: true,
        }
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }
}
