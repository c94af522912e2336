/// UI widgets for ProjShelf.

pub mod status_bar;
pub mod toolbar;
pub mod tree_view;
