/// PDF text extraction for the viewer window.
///
/// A thin pass-through to `pdf-extract`: read the file, hand the bytes to
/// the library, return the concatenated page text. Extraction failures
/// surface to the caller like any other operation error.
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to read {1}: {0}")]
    Io(#[source] std::io::Error, PathBuf),

    #[error("failed to extract text from {1}: {0}")]
    Extract(#[source] pdf_extract::OutputError, PathBuf),
}

/// `true` if the path has a `.pdf` extension (case-insensitive).
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Extract the full text of a PDF document.
pub fn extract_text(path: &Path) -> Result<String, PdfError> {
    let bytes =
        std::fs::read(path).map_err(|e| PdfError::Io(e, path.to_path_buf()))?;
    pdf_extract::extract_text_from_mem(&bytes)
        .map_err(|e| PdfError::Extract(e, path.to_path_buf()))
}
