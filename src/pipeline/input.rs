//! Input validation: make sure the path names a readable PDF before pdfium
//! ever sees it.
//!
//! pdfium reports a missing file and a JPEG renamed to `.pdf` with the same
//! opaque error code. Checking existence, readability and the `%PDF` magic
//! bytes up front turns those into a precise
//! [`Pdf2PptxError::DocumentOpenFailure`].

use crate::error::Pdf2PptxError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate a local PDF path and return it canonicalised where possible.
pub fn resolve_input(path: &Path) -> Result<PathBuf, Pdf2PptxError> {
    let fail = |detail: String| Pdf2PptxError::DocumentOpenFailure {
        path: path.to_path_buf(),
        detail,
    };

    if !path.exists() {
        return Err(fail("file not found".into()));
    }
    if path.is_dir() {
        return Err(fail("path is a directory".into()));
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_err() {
                return Err(fail("file is too short to be a PDF".into()));
            }
            if &magic != b"%PDF" {
                return Err(fail(format!("not a PDF (first bytes: {magic:?})")));
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(fail("permission denied".into()));
        }
        Err(e) => return Err(fail(e.to_string())),
    }

    let resolved = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    debug!("Resolved local PDF: {}", resolved.display());
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_an_open_failure() {
        let err = resolve_input(Path::new("/definitely/not/a/real/file.pdf")).unwrap_err();
        match err {
            Pdf2PptxError::DocumentOpenFailure { detail, .. } => {
                assert!(detail.contains("not found"), "got: {detail}")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"\x89PNG not a pdf").unwrap();
        let err = resolve_input(f.path()).unwrap_err();
        assert!(matches!(err, Pdf2PptxError::DocumentOpenFailure { .. }));
    }

    #[test]
    fn truncated_file_is_rejected() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%P").unwrap();
        assert!(resolve_input(f.path()).is_err());
    }

    #[test]
    fn directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_input(dir.path()).is_err());
    }

    #[test]
    fn pdf_magic_is_accepted() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%PDF-1.7\n%%EOF\n").unwrap();
        assert!(resolve_input(f.path()).is_ok());
    }
}
