/// Analysis modules — read-only computations over a scanned tree.
pub mod summary;

pub use summary::{summarize, DirSummary};
