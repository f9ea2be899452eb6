// regline-core/src/infrastructure/fs.rs

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ReglineError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::lister::DirectoryLister;

/// Filesystem-backed directory snapshot. Non-recursive: the regulatory drop
/// directories are flat.
pub struct FsDirectoryLister;

impl DirectoryLister for FsDirectoryLister {
    fn list(&self, dir: &Path) -> Result<BTreeMap<String, PathBuf>, ReglineError> {
        if !dir.is_dir() {
            return Err(ReglineError::Infrastructure(
                InfrastructureError::DirectoryNotFound(dir.display().to_string()),
            ));
        }

        let mut listing = BTreeMap::new();
        let walker = WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true);

        for entry in walker.into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let stem = path
                .file_stem()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            listing.insert(stem, path.to_path_buf());
        }

        Ok(listing)
    }
}

/// Write content to a file atomically using a temporary file.
///
/// The temporary file lives in the target's own directory so the final
/// rename never crosses a filesystem boundary.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = path.parent().unwrap_or_else(|| Path::new("."));

    let mut temp_file = tempfile::NamedTempFile::new_in(parent).map_err(InfrastructureError::Io)?;

    temp_file
        .write_all(content.as_ref())
        .map_err(InfrastructureError::Io)?;

    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}
