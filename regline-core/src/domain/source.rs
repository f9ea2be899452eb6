// regline-core/src/domain/source.rs
//
// Closed, statically validated source definitions. One tagged struct per
// kind of work (import vs. script) — no runtime key-presence checks.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a logical source name is matched against a file stem on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// File stem must equal the source name (case-folded).
    Exact,
    /// First 4 characters of the file stem must equal the source name
    /// (case-folded). Supports date-suffixed feeds like `bhcf20240630.csv`.
    Prefix,
}

/// What happens when a load's destination table already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExistencePolicy {
    /// Abort the load if the table exists.
    Fail,
    /// Drop and recreate the table before writing.
    Replace,
    /// Add rows without deleting existing ones. Accumulates across
    /// back-to-back imports into the same table within one run.
    Append,
}

/// Ordinal grouping of SQL scripts. Variant order IS the execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptPhase {
    Preflight,
    Dependency,
    Attributes,
    Relationships,
    Transformations,
    GovIdentifiers,
    CallReports,
    Cleanup,
}

impl ScriptPhase {
    /// Sequential phases run one script at a time, in catalog order.
    /// Later phases may fan out because their scripts target disjoint tables
    /// (a catalog-authoring invariant, not enforced at runtime).
    pub fn is_sequential(self) -> bool {
        matches!(self, ScriptPhase::Preflight | ScriptPhase::Dependency)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScriptPhase::Preflight => "preflight",
            ScriptPhase::Dependency => "dependency",
            ScriptPhase::Attributes => "attributes",
            ScriptPhase::Relationships => "relationships",
            ScriptPhase::Transformations => "transformations",
            ScriptPhase::GovIdentifiers => "gov_identifiers",
            ScriptPhase::CallReports => "call_reports",
            ScriptPhase::Cleanup => "cleanup",
        }
    }
}

impl std::fmt::Display for ScriptPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logical CSV feed. Immutable after catalog load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSource {
    pub name: String,

    #[serde(rename = "match")]
    pub match_kind: MatchKind,

    pub destination_schema: String,
    pub destination_table: String,

    #[serde(rename = "if_exists")]
    pub existence_policy: ExistencePolicy,

    #[serde(default = "default_separator")]
    pub field_separator: char,

    /// Columns to keep, by original header name. Empty means: import every
    /// column after header normalization.
    #[serde(default)]
    pub column_projection: Vec<String>,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl ImportSource {
    /// Delimiter for the tabular reader. The catalog rejects non-ASCII
    /// separators at construction, so the cast is lossless here.
    pub fn separator_byte(&self) -> u8 {
        self.field_separator as u8
    }
}

/// A logical SQL unit of work. The name doubles as the file stem to match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptSource {
    pub name: String,
    pub phase: ScriptPhase,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

fn default_separator() -> char {
    ','
}

/// Result of matching a source to the filesystem. Created fresh per run,
/// never persisted. `absolute_path = None` signals an unresolved source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub source_name: String,
    pub absolute_path: Option<PathBuf>,
    pub match_kind: MatchKind,
}

impl ResolvedFile {
    pub fn is_resolved(&self) -> bool {
        self.absolute_path.is_some()
    }
}
