// regline-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use duckdb::{Config, Connection, params, params_from_iter};
use std::sync::{Arc, Mutex, MutexGuard};

// Imports Hexagonaux
use crate::domain::source::ExistencePolicy;
use crate::error::ReglineError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::reader::RowSet;
use crate::ports::store::{BulkWriter, ScriptRunner};

/// DuckDB-backed store. Implements both halves of `SqlStore`: the
/// transactional script batch and the policy-driven bulk write.
pub struct DuckDbStore {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDbStore {
    pub fn open(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();

        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, ReglineError> {
        self.conn.lock().map_err(|_| {
            ReglineError::Infrastructure(InfrastructureError::Io(std::io::Error::other(
                "DuckDB Mutex Poisoned",
            )))
        })
    }

    /// Single-value query, used by tests to inspect load results.
    pub fn query_scalar(&self, query: &str) -> Result<i64, ReglineError> {
        let conn = self.lock()?;
        conn.query_row(query, params![], |row| row.get(0))
            .map_err(db_err)
    }
}

fn db_err(e: duckdb::Error) -> ReglineError {
    ReglineError::Infrastructure(InfrastructureError::Database(DatabaseError::DuckDB(e)))
}

fn write_err(msg: String) -> ReglineError {
    ReglineError::Infrastructure(InfrastructureError::WriteError(msg))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn table_exists(conn: &Connection, schema: &str, table: &str) -> Result<bool, ReglineError> {
    let count: i64 = conn
        .query_row(
            "SELECT count(*) FROM information_schema.tables \
             WHERE table_schema = ? AND table_name = ?",
            params![schema, table],
            |row| row.get(0),
        )
        .map_err(db_err)?;
    Ok(count > 0)
}

fn column_count(conn: &Connection, schema: &str, table: &str) -> Result<usize, ReglineError> {
    let count: i64 = conn
        .query_row(
            "SELECT count(*) FROM information_schema.columns \
             WHERE table_schema = ? AND table_name = ?",
            params![schema, table],
            |row| row.get(0),
        )
        .map_err(db_err)?;
    Ok(count as usize)
}

#[async_trait]
impl ScriptRunner for DuckDbStore {
    async fn execute_batch(&self, sql: &str) -> Result<(), ReglineError> {
        let mut conn = self.lock()?;
        // Dropping an uncommitted transaction rolls the whole batch back.
        let tx = conn.transaction().map_err(db_err)?;
        tx.execute_batch(sql).map_err(db_err)?;
        tx.commit().map_err(db_err)
    }
}

#[async_trait]
impl BulkWriter for DuckDbStore {
    async fn ensure_schema(&self, schema: &str) -> Result<(), ReglineError> {
        let conn = self.lock()?;
        conn.execute_batch(&format!(
            "CREATE SCHEMA IF NOT EXISTS {}",
            quote_ident(schema)
        ))
        .map_err(db_err)
    }

    async fn write(
        &self,
        schema: &str,
        table: &str,
        policy: ExistencePolicy,
        rows: &RowSet,
    ) -> Result<(), ReglineError> {
        if rows.columns.is_empty() {
            return Err(write_err(format!(
                "no columns to write into {schema}.{table}"
            )));
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(db_err)?;

        let qualified = format!("{}.{}", quote_ident(schema), quote_ident(table));
        let exists = table_exists(&tx, schema, table)?;

        let must_create = match policy {
            ExistencePolicy::Fail if exists => {
                return Err(write_err(format!(
                    "table {schema}.{table} already exists (policy: fail)"
                )));
            }
            ExistencePolicy::Fail => true,
            ExistencePolicy::Replace => {
                if exists {
                    tx.execute_batch(&format!("DROP TABLE {qualified}"))
                        .map_err(db_err)?;
                }
                true
            }
            ExistencePolicy::Append => {
                if exists {
                    // Shape check: appending into a table of another width
                    // would silently shift columns.
                    let width = column_count(&tx, schema, table)?;
                    if width != rows.columns.len() {
                        return Err(write_err(format!(
                            "table {schema}.{table} has {width} columns, row-set has {} (policy: append)",
                            rows.columns.len()
                        )));
                    }
                }
                !exists
            }
        };

        if must_create {
            // Staging tables are all-VARCHAR; the transformation scripts own
            // the typing.
            let cols: Vec<String> = rows
                .columns
                .iter()
                .map(|c| format!("{} VARCHAR", quote_ident(c)))
                .collect();
            tx.execute_batch(&format!("CREATE TABLE {qualified} ({})", cols.join(", ")))
                .map_err(db_err)?;
        }

        if !rows.is_empty() {
            let placeholders = vec!["?"; rows.columns.len()].join(", ");
            let insert = format!("INSERT INTO {qualified} VALUES ({placeholders})");
            let mut stmt = tx.prepare(&insert).map_err(db_err)?;
            for row in &rows.rows {
                stmt.execute(params_from_iter(row.iter())).map_err(db_err)?;
            }
            drop(stmt);
        }

        tx.commit().map_err(db_err)
    }
}
