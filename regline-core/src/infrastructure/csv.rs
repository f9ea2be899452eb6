// regline-core/src/infrastructure/csv.rs

use std::path::Path;

use csv::ReaderBuilder;

use crate::error::ReglineError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::reader::{RowSet, TabularReader};

/// Delimited-text reader over the `csv` crate. UTF-8 only; a header row is
/// required; ragged rows surface as read errors.
pub struct CsvTableReader;

impl TabularReader for CsvTableReader {
    fn read(&self, path: &Path, separator: u8) -> Result<RowSet, ReglineError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(separator)
            .has_headers(true)
            .flexible(false)
            .from_path(path)
            .map_err(InfrastructureError::Csv)?;

        let columns: Vec<String> = reader
            .headers()
            .map_err(InfrastructureError::Csv)?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(InfrastructureError::Csv)?;
            rows.push(record.iter().map(|f| f.to_string()).collect());
        }

        Ok(RowSet { columns, rows })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_read_comma_separated() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("codes.csv");
        fs::write(&path, "CODE,NAME\n01,Alpha\n02,Beta\n")?;

        let rows = CsvTableReader.read(&path, b',')?;
        assert_eq!(rows.columns, vec!["CODE", "NAME"]);
        assert_eq!(rows.rows.len(), 2);
        assert_eq!(rows.rows[1], vec!["02", "Beta"]);
        Ok(())
    }

    #[test]
    fn test_read_caret_separated() -> Result<()> {
        // The holding-company feed uses `^` as its delimiter.
        let dir = tempdir()?;
        let path = dir.path().join("bhcf20240630.csv");
        fs::write(&path, "RSSD9001^RSSD9999^BHCA2170\n12345^20240630^1000\n")?;

        let rows = CsvTableReader.read(&path, b'^')?;
        assert_eq!(rows.columns, vec!["RSSD9001", "RSSD9999", "BHCA2170"]);
        assert_eq!(rows.rows[0], vec!["12345", "20240630", "1000"]);
        Ok(())
    }

    #[test]
    fn test_ragged_row_is_read_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("bad.csv");
        fs::write(&path, "A,B\n1,2\n3\n")?;

        let result = CsvTableReader.read(&path, b',');
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = CsvTableReader.read(Path::new("/nonexistent/file.csv"), b',');
        assert!(result.is_err());
    }
}
