// regline-core/src/application/pipeline.rs
//
// Stage orchestration: Bootstrap -> Preflight -> Dependency -> Import ->
// Transform. Hard barrier between stages: every outcome of stage N is
// collected before stage N+1 starts. The run always reaches Completed; the
// aggregated report carries the per-source verdicts.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use futures::StreamExt; // Extension trait for streams

use crate::application::load::LoadExecutor;
use crate::application::script::ScriptExecutor;
use crate::domain::catalog::SourceCatalog;
use crate::domain::outcome::{ExecutionOutcome, RunReport};
use crate::domain::resolve::resolve;
use crate::domain::source::{MatchKind, ResolvedFile, ScriptPhase, ScriptSource};
use crate::error::ReglineError;
use crate::infrastructure::config::ProjectConfig;
use crate::ports::lister::DirectoryLister;
use crate::ports::reader::TabularReader;
use crate::ports::store::SqlStore;

pub async fn run_pipeline<S>(
    catalog: &SourceCatalog,
    config: &ProjectConfig,
    project_dir: &Path,
    lister: &dyn DirectoryLister,
    reader: &dyn TabularReader,
    store: &S,
) -> Result<RunReport, ReglineError>
where
    S: SqlStore,
{
    println!("🚀 Starting ETL Orchestrator...");
    let start_time = std::time::Instant::now();
    let started_at = chrono::Utc::now().to_rfc3339();

    // 1. SETUP (Infra/IO)
    let target_dir = project_dir.join(&config.target_dir);
    if !target_dir.exists() {
        fs::create_dir_all(&target_dir)?;
    }

    // 2. RESOLUTION (shared snapshots)
    // Each directory is listed exactly once per run; every source in every
    // stage matches against the same view of the disk. A missing directory
    // aborts before any stage touches the store.
    let import_listing = lister.list(&project_dir.join(&config.import_dir))?;
    let script_listing = lister.list(&project_dir.join(&config.scripts_dir))?;

    // 3. BOOTSTRAP (idempotent schema creation; errors here are fatal)
    println!("🧱 Bootstrapping schema '{}'...", config.schema);
    store.ensure_schema(&config.schema).await?;

    let resolved_imports = resolve(catalog.imports(), &import_listing);
    let resolved_scripts: HashMap<String, ResolvedFile> =
        resolve(catalog.scripts(), &script_listing)
            .into_iter()
            .map(|r| (r.source_name.clone(), r))
            .collect();

    let workers = worker_count();
    let mut outcomes: Vec<ExecutionOutcome> = Vec::new();

    // 4. PREFLIGHT + DEPENDENCY (strictly sequential, catalog order)
    // Later steps assume these completed and committed; one worker only.
    for phase in [ScriptPhase::Preflight, ScriptPhase::Dependency] {
        let scripts = catalog.scripts_in(phase);
        if scripts.is_empty() {
            continue;
        }
        println!(
            "  🔹 Phase '{}' ({} scripts, sequential)...",
            phase,
            scripts.len()
        );
        for script in scripts {
            let resolved = resolved_for(&resolved_scripts, script);
            outcomes.push(ScriptExecutor::run(script, &resolved, store).await);
        }
    }

    // 5. IMPORT (parallel fan-out, bounded worker pool)
    if !catalog.imports().is_empty() {
        println!(
            "  🔹 Phase 'import' ({} sources, {} workers)...",
            catalog.imports().len(),
            workers
        );
        let futures = catalog
            .imports()
            .iter()
            .zip(resolved_imports.iter())
            .map(|(source, resolved)| async move {
                LoadExecutor::load(source, resolved, reader, store).await
            });

        // All items of this stage finish before the next stage starts.
        let stream = futures::stream::iter(futures).buffer_unordered(workers);
        let mut results: Vec<_> = stream.collect().await;
        outcomes.append(&mut results);
    }

    // 6. TRANSFORM (phase groups in ordinal order, fan-out within a group)
    for phase in catalog.transform_phases() {
        let scripts = catalog.scripts_in(phase);
        if scripts.is_empty() {
            continue;
        }
        println!(
            "  🔹 Phase '{}' ({} scripts, {} workers)...",
            phase,
            scripts.len(),
            workers
        );
        let futures = scripts.into_iter().map(|script| {
            let resolved = resolved_for(&resolved_scripts, script);
            async move { ScriptExecutor::run(script, &resolved, store).await }
        });

        let stream = futures::stream::iter(futures).buffer_unordered(workers);
        let mut results: Vec<_> = stream.collect().await;
        outcomes.append(&mut results);
    }

    // 7. FINALIZE
    let report = RunReport::new(
        started_at,
        start_time.elapsed().as_secs_f64(),
        outcomes,
    );
    save_json(&target_dir.join("run_report.json"), &report)?;

    println!(
        "✨ Done in {:.2}s. {} succeeded, {} skipped, {} failed.",
        report.duration_secs, report.succeeded, report.skipped, report.failed
    );

    Ok(report)
}

// --- HELPER FUNCTIONS ---

/// Import and Transform fan out across a pool sized to the host.
fn worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn resolved_for(map: &HashMap<String, ResolvedFile>, script: &ScriptSource) -> ResolvedFile {
    map.get(&script.name).cloned().unwrap_or(ResolvedFile {
        source_name: script.name.clone(),
        absolute_path: None,
        match_kind: MatchKind::Exact,
    })
}

fn save_json<T: serde::Serialize>(path: &Path, data: &T) -> Result<(), ReglineError> {
    let content = serde_json::to_string_pretty(data)
        .map_err(|e| ReglineError::InternalError(format!("Serialization: {}", e)))?;
    crate::infrastructure::fs::atomic_write(path, content)?;
    Ok(())
}
