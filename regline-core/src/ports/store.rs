// regline-core/src/ports/store.rs
//
// What the pipeline needs from the destination store, without knowing which
// engine sits behind it. The concrete handle is opened by the caller and
// passed into the orchestrator: lifecycle is explicit, never ambient.

use async_trait::async_trait;

use crate::domain::source::ExistencePolicy;
use crate::error::ReglineError;
use crate::ports::reader::RowSet;

/// Executes raw SQL text as a single statement batch inside one
/// transaction. Commit only if the entire batch succeeds.
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    async fn execute_batch(&self, sql: &str) -> Result<(), ReglineError>;
}

/// Writes row-sets into destination tables under an existence policy.
#[async_trait]
pub trait BulkWriter: Send + Sync {
    /// Idempotent `CREATE SCHEMA IF NOT EXISTS`.
    async fn ensure_schema(&self, schema: &str) -> Result<(), ReglineError>;

    async fn write(
        &self,
        schema: &str,
        table: &str,
        policy: ExistencePolicy,
        rows: &RowSet,
    ) -> Result<(), ReglineError>;
}

/// The transactional handle the orchestrator is constructed with.
pub trait SqlStore: ScriptRunner + BulkWriter {}

impl<T: ScriptRunner + BulkWriter> SqlStore for T {}
