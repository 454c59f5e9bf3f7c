//! Staging files and atomic publication.
//!
//! A package is written to a hidden file next to its destination and only
//! renamed onto the destination once it is complete. If the conversion
//! fails, the staging file is removed when it is dropped. A crashed process
//! can still leave one behind; [`clean`] removes those.

use crate::error::Pdf2PptxError;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// File-name prefix of every staging file.
pub const STAGING_PREFIX: &str = ".pdf2pptx-staging-";

/// A package being written, not yet visible at its destination.
pub struct StagedPackage {
    file: NamedTempFile,
    destination: PathBuf,
}

impl StagedPackage {
    /// Create a staging file in the destination's directory, creating that
    /// directory if needed.
    pub fn create(destination: &Path) -> Result<Self, Pdf2PptxError> {
        let dir = staging_dir(destination);
        std::fs::create_dir_all(&dir)
            .map_err(|e| Pdf2PptxError::write(dir.display().to_string(), e))?;

        let file = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(".pptx")
            .tempfile_in(&dir)
            .map_err(|e| Pdf2PptxError::write(destination.display().to_string(), e))?;
        debug!("Staging {} at {}", destination.display(), file.path().display());

        Ok(Self {
            file,
            destination: destination.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// A buffered writer over the staging file.
    pub fn writer(&mut self) -> BufWriter<&mut File> {
        BufWriter::new(self.file.as_file_mut())
    }

    /// Flush to disk and rename onto the destination, replacing any existing
    /// file there.
    pub fn publish(self) -> Result<PathBuf, Pdf2PptxError> {
        let target = self.destination.display().to_string();
        self.file
            .as_file()
            .sync_all()
            .map_err(|e| Pdf2PptxError::write(target.clone(), e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(self.file.path(), std::fs::Permissions::from_mode(0o644))
                .map_err(|e| Pdf2PptxError::write(target.clone(), e))?;
        }

        self.file
            .persist(&self.destination)
            .map_err(|e| Pdf2PptxError::write(target, e.error))?;
        info!("Wrote {}", self.destination.display());
        Ok(self.destination)
    }
}

fn staging_dir(destination: &Path) -> PathBuf {
    match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Remove leftover staging files in `dir` and return the removed paths.
///
/// Only regular files whose name starts with [`STAGING_PREFIX`] are touched.
/// A missing directory has nothing to clean.
pub fn clean(dir: &Path) -> Result<Vec<PathBuf>, Pdf2PptxError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Pdf2PptxError::write(dir.display().to_string(), e)),
    };

    let mut removed = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Pdf2PptxError::write(dir.display().to_string(), e))?;
        let is_staging = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(STAGING_PREFIX));
        if !is_staging {
            continue;
        }
        match entry.file_type() {
            Ok(ft) if ft.is_file() => {}
            _ => continue,
        }

        let path = entry.path();
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed {}", path.display());
                removed.push(path);
            }
            // Another cleaner got there first.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!("Could not remove {}: {e}", path.display());
                return Err(Pdf2PptxError::write(path.display().to_string(), e));
            }
        }
    }

    removed.sort();
    info!("Removed {} staging file(s) from {}", removed.len(), dir.display());
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn publish_moves_file_into_place() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("deck.pptx");

        let mut staged = StagedPackage::create(&dest).unwrap();
        let staging_path = staged.path().to_path_buf();
        assert!(staging_path
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with(STAGING_PREFIX));
        {
            let mut w = staged.writer();
            w.write_all(b"package").unwrap();
            w.flush().unwrap();
        }
        assert!(!dest.exists());

        let published = staged.publish().unwrap();
        assert_eq!(published, dest);
        assert_eq!(std::fs::read(&dest).unwrap(), b"package");
        assert!(!staging_path.exists());
    }

    #[test]
    fn dropping_discards_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("deck.pptx");
        let staged = StagedPackage::create(&dest).unwrap();
        let staging_path = staged.path().to_path_buf();
        assert!(staging_path.exists());
        drop(staged);
        assert!(!staging_path.exists());
        assert!(!dest.exists());
    }

    #[test]
    fn publish_replaces_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("deck.pptx");
        std::fs::write(&dest, b"old").unwrap();

        let mut staged = StagedPackage::create(&dest).unwrap();
        {
            let mut w = staged.writer();
            w.write_all(b"new").unwrap();
            w.flush().unwrap();
        }
        staged.publish().unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"new");
    }

    #[test]
    fn missing_parent_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a").join("b").join("deck.pptx");
        let staged = StagedPackage::create(&dest).unwrap();
        assert_eq!(staged.path().parent().unwrap(), dest.parent().unwrap());
    }

    #[test]
    fn clean_removes_only_staging_files() {
        let dir = tempfile::tempdir().unwrap();
        let leftover = dir.path().join(format!("{STAGING_PREFIX}abc123.pptx"));
        let keep = dir.path().join("deck.pptx");
        let nested = dir.path().join(format!("{STAGING_PREFIX}dir"));
        std::fs::write(&leftover, b"partial").unwrap();
        std::fs::write(&keep, b"done").unwrap();
        std::fs::create_dir(&nested).unwrap();

        let removed = clean(dir.path()).unwrap();
        assert_eq!(removed, vec![leftover.clone()]);
        assert!(!leftover.exists());
        assert!(keep.exists());
        assert!(nested.exists());
    }

    #[test]
    fn clean_missing_directory_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        assert!(clean(&dir.path().join("nope")).unwrap().is_empty());
    }
}
