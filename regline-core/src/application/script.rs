// regline-core/src/application/script.rs

use std::fs;
use std::time::Instant;

use tracing::{debug, error, instrument};

use crate::domain::outcome::ExecutionOutcome;
use crate::domain::source::{ResolvedFile, ScriptSource};
use crate::error::ReglineError;
use crate::ports::store::ScriptRunner;

pub struct ScriptExecutor;

impl ScriptExecutor {
    /// Runs one SQL script as a single transactional batch. Failure policy
    /// is catch-record-continue: the pipeline favors maximal progress per
    /// run over fail-fast.
    #[instrument(skip(resolved, runner), fields(script = %source.name))]
    pub async fn run(
        source: &ScriptSource,
        resolved: &ResolvedFile,
        runner: &dyn ScriptRunner,
    ) -> ExecutionOutcome {
        if !source.enabled {
            debug!("script disabled, skipping");
            return ExecutionOutcome::skipped(&source.name);
        }

        let Some(path) = resolved.absolute_path.as_deref() else {
            return ExecutionOutcome::failed(
                &source.name,
                format!("no file resolved for script source '{}'", source.name),
            );
        };

        let start = Instant::now();

        let result: Result<(), ReglineError> = async {
            let sql = fs::read_to_string(path)?;
            runner.execute_batch(&sql).await
        }
        .await;

        let duration = start.elapsed();

        match result {
            Ok(()) => {
                debug!("✅ Script finished in {:.2?}", duration);
                ExecutionOutcome::succeeded(&source.name)
            }
            Err(e) => {
                // On log l'erreur ici pour garder l'identité du script,
                // même si elle ne remonte jamais plus haut.
                error!("❌ Script failed after {:.2?}: {}", duration, e);
                ExecutionOutcome::failed(&source.name, e.to_string())
            }
        }
    }
}
