/// UI panels for ProjShelf.

pub mod details_panel;
pub mod tree_panel;
