//! Error types for the pdf2pptx library.
//!
//! Every failure is fatal to the conversion: a deck is either produced in
//! full or not at all. [`Pdf2PptxError`] is therefore the only error type the
//! public entry points return, and callers never see a half-written package.
//!
//! Where a failure is tied to one page of the input, the variant carries the
//! page's 0-based index so the offending page can be located.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2pptx library.
#[derive(Debug, Error)]
pub enum Pdf2PptxError {
    // ── Caller errors ─────────────────────────────────────────────────────
    /// A configuration value is out of range (DPI of 0, unknown pairing mode).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// An API was used out of order (e.g. `add_slide` after `finalize`).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// The input is missing, unreadable, encrypted without a password, or not a PDF.
    #[error("Cannot open document '{path}': {detail}")]
    DocumentOpenFailure { path: PathBuf, detail: String },

    /// A page could not be rasterised or its text layer could not be read.
    #[error("Rendering failed for page index {page}: {detail}")]
    RenderFailure { page: usize, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The package or the destination file could not be written.
    #[error("Failed to write '{target}': {source}")]
    WriteFailure {
        target: String,
        #[source]
        source: std::io::Error,
    },

    // ── Engine errors ─────────────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_LIB_PATH to the pdfium shared library (or the directory holding it),\n\
place the library in the working directory, or install it system-wide.\n\
Pre-built libraries: https://github.com/bblanchon/pdfium-binaries/releases\n"
    )]
    EngineUnavailable(String),

    /// Unexpected internal error (a blocking worker panicked).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2PptxError {
    /// The 0-based page index this error refers to, if any.
    pub fn page(&self) -> Option<usize> {
        match self {
            Pdf2PptxError::RenderFailure { page, .. } => Some(*page),
            _ => None,
        }
    }

    pub(crate) fn write(target: impl Into<String>, source: std::io::Error) -> Self {
        Pdf2PptxError::WriteFailure {
            target: target.into(),
            source,
        }
    }

    pub(crate) fn render(page: usize, detail: impl ToString) -> Self {
        Pdf2PptxError::RenderFailure {
            page,
            detail: detail.to_string(),
        }
    }
}

/// Zip errors surface while a named part is being written; the caller
/// attaches the part name via [`Pdf2PptxError::write`].
pub(crate) fn zip_to_io(err: zip::result::ZipError) -> std::io::Error {
    match err {
        zip::result::ZipError::Io(e) => e,
        other => std::io::Error::other(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_failure_carries_page_index() {
        let e = Pdf2PptxError::render(2, "bad content stream");
        assert_eq!(e.page(), Some(2));
        let msg = e.to_string();
        assert!(msg.contains("page index 2"), "got: {msg}");
        assert!(msg.contains("bad content stream"));
    }

    #[test]
    fn other_variants_have_no_page() {
        assert_eq!(Pdf2PptxError::InvalidParameter("dpi".into()).page(), None);
        assert_eq!(Pdf2PptxError::InvalidState("twice".into()).page(), None);
    }

    #[test]
    fn write_failure_display_names_target() {
        let e = Pdf2PptxError::write(
            "ppt/slides/slide1.xml",
            std::io::Error::new(std::io::ErrorKind::StorageFull, "disk full"),
        );
        let msg = e.to_string();
        assert!(msg.contains("ppt/slides/slide1.xml"), "got: {msg}");
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn zip_io_error_is_unwrapped() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let mapped = zip_to_io(zip::result::ZipError::Io(io));
        assert_eq!(mapped.kind(), std::io::ErrorKind::PermissionDenied);
    }
}
