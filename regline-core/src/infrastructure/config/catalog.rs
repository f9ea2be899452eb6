// regline-core/src/infrastructure/config/catalog.rs

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::domain::catalog::SourceCatalog;
use crate::domain::source::{ImportSource, ScriptSource};
use crate::error::ReglineError;
use crate::infrastructure::error::InfrastructureError;

#[derive(Debug, Deserialize, Default)]
struct CatalogFile {
    #[serde(default)]
    imports: Vec<ImportSource>,
    #[serde(default)]
    scripts: Vec<ScriptSource>,
}

/// Loads a catalog file and validates it through the domain constructor.
/// Duplicate names abort here, before any phase runs.
pub fn load_catalog(path: &Path) -> Result<SourceCatalog, ReglineError> {
    if !path.exists() {
        return Err(ReglineError::Infrastructure(
            InfrastructureError::ConfigNotFound(path.display().to_string()),
        ));
    }

    let content = fs::read_to_string(path).map_err(InfrastructureError::Io)?;
    let file: CatalogFile =
        serde_yaml::from_str(&content).map_err(InfrastructureError::YamlError)?;

    SourceCatalog::new(file.imports, file.scripts).map_err(ReglineError::Domain)
}
