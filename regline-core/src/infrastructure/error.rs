// regline-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(regline::infra::database::duckdb),
        help("An error occurred inside the SQL engine.")
    )]
    DuckDB(#[from] duckdb::Error),
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(regline::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    #[error("Directory not found: '{0}'")]
    #[diagnostic(
        code(regline::infra::directory_missing),
        help("The import and scripts directories must exist before a run starts.")
    )]
    DirectoryNotFound(String),

    #[error("Bulk Write Error: {0}")]
    #[diagnostic(
        code(regline::infra::write),
        help("Check the existence policy and the destination table's shape.")
    )]
    WriteError(String),

    // --- TABULAR INPUT ---
    #[error("CSV Read Error: {0}")]
    #[diagnostic(
        code(regline::infra::csv),
        help("Check the file's delimiter, encoding and row widths.")
    )]
    Csv(#[from] csv::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(regline::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(regline::infra::config_missing))]
    ConfigNotFound(String),
}

// Manual implementation for shortcuts (e.g. `?` operator on duckdb calls)
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}
