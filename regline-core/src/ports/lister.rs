// regline-core/src/ports/lister.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ReglineError;

/// Produces the per-run directory snapshot: file stem -> absolute path, for
/// regular files only. Sorted keys make duplicate resolution deterministic
/// ("last match wins" picks the greatest stem).
pub trait DirectoryLister: Send + Sync {
    fn list(&self, dir: &Path) -> Result<BTreeMap<String, PathBuf>, ReglineError>;
}
