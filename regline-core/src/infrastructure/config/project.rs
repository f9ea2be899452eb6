// regline-core/src/infrastructure/config/project.rs

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::infrastructure::error::InfrastructureError;

/// Project-level settings. Everything but `name` has a sensible default so a
/// minimal `regline.yaml` is enough to run.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    pub name: String,

    /// DuckDB file path, or ":memory:".
    #[serde(default = "default_database")]
    pub database: String,

    /// Destination schema housing both tmp_* staging and production tables.
    #[serde(default = "default_schema")]
    pub schema: String,

    #[serde(default = "default_import_dir")]
    pub import_dir: String,

    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: String,

    /// Where run artifacts (run_report.json) land.
    #[serde(default = "default_target_dir")]
    pub target_dir: String,

    /// Optional catalog file overriding the builtin FFIEC catalog.
    #[serde(default)]
    pub catalog: Option<String>,
}

fn default_database() -> String {
    "regline.duckdb".to_string()
}
fn default_schema() -> String {
    "transformations".to_string()
}
fn default_import_dir() -> String {
    "imports".to_string()
}
fn default_scripts_dir() -> String {
    "scripts".to_string()
}
fn default_target_dir() -> String {
    "target".to_string()
}

#[instrument(skip(project_dir))] // Log automatique de l'entrée/sortie de la fonction
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    // 1. Découverte du fichier principal
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project configuration");

    // 2. Chargement YAML
    let content = fs::read_to_string(&config_path).map_err(InfrastructureError::Io)?;
    let mut config: ProjectConfig =
        serde_yaml::from_str(&content).map_err(InfrastructureError::YamlError)?;

    // 3. Override via Variables d'Environnement (Pattern 'Layering')
    // Permet de faire: REGLINE_DATABASE=/tmp/etl.duckdb regline
    apply_env_overrides(&mut config);

    Ok(config)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    let candidates = ["regline.yaml", "regline.yml"];
    for filename in candidates {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, candidates
    )))
}

fn apply_env_overrides(config: &mut ProjectConfig) {
    if let Ok(val) = std::env::var("REGLINE_DATABASE") {
        info!(old = ?config.database, new = ?val, "Overriding database via ENV");
        config.database = val;
    }
    if let Ok(val) = std::env::var("REGLINE_IMPORT_DIR") {
        info!(old = ?config.import_dir, new = ?val, "Overriding import dir via ENV");
        config.import_dir = val;
    }
    if let Ok(val) = std::env::var("REGLINE_SCRIPTS_DIR") {
        info!(old = ?config.scripts_dir, new = ?val, "Overriding scripts dir via ENV");
        config.scripts_dir = val;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_minimal_config_gets_defaults() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("regline.yaml"), "name: ffiec-etl\n")?;

        let config = load_project_config(dir.path())?;
        assert_eq!(config.name, "ffiec-etl");
        assert_eq!(config.schema, "transformations");
        assert_eq!(config.import_dir, "imports");
        assert_eq!(config.scripts_dir, "scripts");
        assert_eq!(config.database, "regline.duckdb");
        assert!(config.catalog.is_none());
        Ok(())
    }

    #[test]
    fn test_yml_extension_also_discovered() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("regline.yml"),
            "name: etl\ndatabase: ':memory:'\n",
        )?;

        let config = load_project_config(dir.path())?;
        assert_eq!(config.database, ":memory:");
        Ok(())
    }

    #[test]
    fn test_missing_config_is_config_not_found() -> Result<()> {
        let dir = tempdir()?;
        let result = load_project_config(dir.path());
        assert!(matches!(
            result,
            Err(InfrastructureError::ConfigNotFound(_))
        ));
        Ok(())
    }
}
