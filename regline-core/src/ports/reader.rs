// regline-core/src/ports/reader.rs

use std::path::Path;

use crate::error::ReglineError;

/// Header plus rows, everything as strings. Typing is the transformation
/// scripts' concern, not the loader's.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RowSet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Delimited-text reader. Blocking by design: a worker blocks while reading
/// its file, there is no mid-operation yielding to schedule around.
pub trait TabularReader: Send + Sync {
    fn read(&self, path: &Path, separator: u8) -> Result<RowSet, ReglineError>;
}
