// regline-core/src/application/load.rs

use tracing::{debug, warn};

use crate::domain::outcome::ExecutionOutcome;
use crate::domain::source::{ImportSource, ResolvedFile};
use crate::error::ReglineError;
use crate::ports::reader::{RowSet, TabularReader};
use crate::ports::store::BulkWriter;

pub struct LoadExecutor;

impl LoadExecutor {
    /// Runs one import source end to end. Errors never escape: they become
    /// a `Failed` outcome so sibling loads in the phase keep going.
    pub async fn load(
        source: &ImportSource,
        resolved: &ResolvedFile,
        reader: &dyn TabularReader,
        sink: &dyn BulkWriter,
    ) -> ExecutionOutcome {
        if !source.enabled {
            debug!(source = %source.name, "import disabled, skipping");
            return ExecutionOutcome::skipped(&source.name);
        }

        let Some(path) = resolved.absolute_path.as_deref() else {
            return ExecutionOutcome::failed(
                &source.name,
                format!("no file resolved for import source '{}'", source.name),
            );
        };

        debug!(source = %source.name, file = %path.display(), "reading import file");

        let result: Result<(), ReglineError> = async {
            let raw = reader.read(path, source.separator_byte())?;
            let rows = shape_columns(raw, &source.column_projection)?;
            sink.write(
                &source.destination_schema,
                &source.destination_table,
                source.existence_policy,
                &rows,
            )
            .await
        }
        .await;

        match result {
            Ok(()) => {
                debug!(
                    source = %source.name,
                    table = %source.destination_table,
                    "import loaded"
                );
                ExecutionOutcome::succeeded(&source.name)
            }
            Err(e) => {
                warn!(source = %source.name, error = %e, "import failed");
                ExecutionOutcome::failed(&source.name, e.to_string())
            }
        }
    }
}

/// Column handling, one branch per catalog shape:
/// - empty projection: keep every column, normalized headers;
/// - non-empty projection: keep exactly those columns by original name,
///   untouched (they are pre-named to match the destination schema).
fn shape_columns(raw: RowSet, projection: &[String]) -> Result<RowSet, ReglineError> {
    if projection.is_empty() {
        return Ok(RowSet {
            columns: raw.columns.iter().map(|c| normalize_header(c)).collect(),
            rows: raw.rows,
        });
    }

    let indices: Vec<usize> = projection
        .iter()
        .map(|wanted| {
            raw.columns
                .iter()
                .position(|c| c == wanted)
                .ok_or_else(|| {
                    ReglineError::InternalError(format!("column '{wanted}' not present in file"))
                })
        })
        .collect::<Result<_, _>>()?;

    // The port contract does not promise rectangular rows; a short row is a
    // read failure, not a panic.
    let rows = raw
        .rows
        .into_iter()
        .map(|row| {
            indices
                .iter()
                .map(|&i| {
                    row.get(i).cloned().ok_or_else(|| {
                        ReglineError::InternalError(format!(
                            "row has {} fields, projection expects column {}",
                            row.len(),
                            i + 1
                        ))
                    })
                })
                .collect::<Result<Vec<String>, _>>()
        })
        .collect::<Result<_, _>>()?;

    Ok(RowSet {
        columns: projection.to_vec(),
        rows,
    })
}

/// Normalizes a header read from file to simplify the SQL statements
/// downstream: strip `#`, lowercase, trim surrounding whitespace.
fn normalize_header(header: &str) -> String {
    header.replace('#', "").to_lowercase().trim().to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::source::{ExistencePolicy, MatchKind};
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};

    // --- MOCK PORTS ---

    struct MockReader {
        rows: RowSet,
    }

    impl TabularReader for MockReader {
        fn read(&self, _path: &Path, _separator: u8) -> Result<RowSet, ReglineError> {
            Ok(self.rows.clone())
        }
    }

    struct FailingReader;

    impl TabularReader for FailingReader {
        fn read(&self, path: &Path, _separator: u8) -> Result<RowSet, ReglineError> {
            Err(ReglineError::InternalError(format!(
                "unreadable: {}",
                path.display()
            )))
        }
    }

    #[derive(Clone)]
    struct MockSink {
        pub writes: Arc<Mutex<Vec<(String, String, ExistencePolicy, RowSet)>>>,
        pub fail: bool,
    }

    impl MockSink {
        fn new() -> Self {
            Self {
                writes: Arc::new(Mutex::new(Vec::new())),
                fail: false,
            }
        }
    }

    #[async_trait]
    impl BulkWriter for MockSink {
        async fn ensure_schema(&self, _schema: &str) -> Result<(), ReglineError> {
            Ok(())
        }

        async fn write(
            &self,
            schema: &str,
            table: &str,
            policy: ExistencePolicy,
            rows: &RowSet,
        ) -> Result<(), ReglineError> {
            if self.fail {
                return Err(ReglineError::InternalError("sink rejected write".into()));
            }
            self.writes.lock().unwrap().push((
                schema.to_string(),
                table.to_string(),
                policy,
                rows.clone(),
            ));
            Ok(())
        }
    }

    fn source(name: &str, projection: &[&str], enabled: bool) -> ImportSource {
        ImportSource {
            name: name.to_string(),
            match_kind: MatchKind::Exact,
            destination_schema: "transformations".into(),
            destination_table: format!("tmp_{name}"),
            existence_policy: ExistencePolicy::Replace,
            field_separator: ',',
            column_projection: projection.iter().map(|c| c.to_string()).collect(),
            enabled,
        }
    }

    fn resolved(name: &str, path: Option<&str>) -> ResolvedFile {
        ResolvedFile {
            source_name: name.to_string(),
            absolute_path: path.map(PathBuf::from),
            match_kind: MatchKind::Exact,
        }
    }

    fn sample_rows() -> RowSet {
        RowSet {
            columns: vec!["#ID".into(), " Name ".into(), "RSSD9001".into()],
            rows: vec![
                vec!["1".into(), "a".into(), "x".into()],
                vec!["2".into(), "b".into(), "y".into()],
            ],
        }
    }

    #[tokio::test]
    async fn test_disabled_source_skipped_without_io() {
        let reader = FailingReader; // would blow up if touched
        let sink = MockSink::new();
        let src = source("feed", &[], false);

        let outcome =
            LoadExecutor::load(&src, &resolved("feed", Some("/data/feed.csv")), &reader, &sink)
                .await;

        assert_eq!(outcome, ExecutionOutcome::skipped("feed"));
        assert!(sink.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unresolved_source_fails() {
        let reader = MockReader { rows: sample_rows() };
        let sink = MockSink::new();
        let src = source("feed", &[], true);

        let outcome = LoadExecutor::load(&src, &resolved("feed", None), &reader, &sink).await;

        assert_eq!(outcome.status, crate::domain::OutcomeStatus::Failed);
        assert!(outcome.error_detail.unwrap().contains("no file resolved"));
    }

    #[tokio::test]
    async fn test_import_all_normalizes_headers() {
        let reader = MockReader { rows: sample_rows() };
        let sink = MockSink::new();
        let src = source("feed", &[], true);

        let outcome =
            LoadExecutor::load(&src, &resolved("feed", Some("/data/feed.csv")), &reader, &sink)
                .await;

        assert_eq!(outcome, ExecutionOutcome::succeeded("feed"));
        let writes = sink.writes.lock().unwrap();
        let (schema, table, policy, rows) = &writes[0];
        assert_eq!(schema, "transformations");
        assert_eq!(table, "tmp_feed");
        assert_eq!(*policy, ExistencePolicy::Replace);
        assert_eq!(rows.columns, vec!["id", "name", "rssd9001"]);
        assert_eq!(rows.rows.len(), 2);
    }

    #[tokio::test]
    async fn test_projection_selects_original_names_unnormalized() {
        let reader = MockReader { rows: sample_rows() };
        let sink = MockSink::new();
        let src = source("feed", &["RSSD9001", "#ID"], true);

        let outcome =
            LoadExecutor::load(&src, &resolved("feed", Some("/data/feed.csv")), &reader, &sink)
                .await;

        assert_eq!(outcome, ExecutionOutcome::succeeded("feed"));
        let writes = sink.writes.lock().unwrap();
        let rows = &writes[0].3;
        // Projection order and casing preserved, no normalization.
        assert_eq!(rows.columns, vec!["RSSD9001", "#ID"]);
        assert_eq!(rows.rows[0], vec!["x", "1"]);
    }

    #[tokio::test]
    async fn test_short_row_under_projection_fails() {
        let mut rows = sample_rows();
        rows.rows.push(vec!["3".into()]); // narrower than the header
        let reader = MockReader { rows };
        let sink = MockSink::new();
        let src = source("feed", &["RSSD9001"], true);

        let outcome =
            LoadExecutor::load(&src, &resolved("feed", Some("/data/feed.csv")), &reader, &sink)
                .await;

        assert_eq!(outcome.status, crate::domain::OutcomeStatus::Failed);
        assert!(sink.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_projected_column_fails() {
        let reader = MockReader { rows: sample_rows() };
        let sink = MockSink::new();
        let src = source("feed", &["BHCA2170"], true);

        let outcome =
            LoadExecutor::load(&src, &resolved("feed", Some("/data/feed.csv")), &reader, &sink)
                .await;

        assert_eq!(outcome.status, crate::domain::OutcomeStatus::Failed);
        assert!(sink.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sink_error_becomes_failed_outcome() {
        let reader = MockReader { rows: sample_rows() };
        let mut sink = MockSink::new();
        sink.fail = true;
        let src = source("feed", &[], true);

        let outcome =
            LoadExecutor::load(&src, &resolved("feed", Some("/data/feed.csv")), &reader, &sink)
                .await;

        assert_eq!(outcome.status, crate::domain::OutcomeStatus::Failed);
        assert!(outcome.error_detail.unwrap().contains("sink rejected"));
    }

    #[test]
    fn test_normalize_header_rules() {
        assert_eq!(normalize_header("#ID_RSSD"), "id_rssd");
        assert_eq!(normalize_header("  NAME  "), "name");
        assert_eq!(normalize_header("D_DT_START"), "d_dt_start");
    }
}
