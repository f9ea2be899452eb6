// regline-core/src/domain/catalog.rs
//
// Static enumeration of the logical sources. Pure data plus validation:
// construction fails fast on duplicate names, before any phase runs.

use std::collections::{BTreeSet, HashSet};

use crate::domain::error::DomainError;
use crate::domain::source::{
    ExistencePolicy, ImportSource, MatchKind, ScriptPhase, ScriptSource,
};

#[derive(Debug, Clone)]
pub struct SourceCatalog {
    imports: Vec<ImportSource>,
    scripts: Vec<ScriptSource>,
}

impl SourceCatalog {
    pub fn new(
        imports: Vec<ImportSource>,
        scripts: Vec<ScriptSource>,
    ) -> Result<Self, DomainError> {
        check_unique(imports.iter().map(|s| s.name.as_str()))?;
        check_unique(scripts.iter().map(|s| s.name.as_str()))?;
        // A multi-byte separator would silently truncate to the wrong
        // delimiter byte at read time; reject it here instead.
        for import in &imports {
            if !import.field_separator.is_ascii() {
                return Err(DomainError::InvalidSeparator {
                    source_name: import.name.clone(),
                    separator: import.field_separator,
                });
            }
        }
        Ok(Self { imports, scripts })
    }

    /// Insertion-ordered import sources.
    pub fn imports(&self) -> &[ImportSource] {
        &self.imports
    }

    /// Insertion-ordered script sources.
    pub fn scripts(&self) -> &[ScriptSource] {
        &self.scripts
    }

    /// Scripts belonging to one phase, in catalog order.
    /// Partitions are disjoint and exhaustive: each script carries exactly
    /// one phase, and every phase shows up through `transform_phases` or the
    /// sequential accessors.
    pub fn scripts_in(&self, phase: ScriptPhase) -> Vec<&ScriptSource> {
        self.scripts.iter().filter(|s| s.phase == phase).collect()
    }

    /// Distinct non-sequential phases present in the catalog, ordinal order.
    pub fn transform_phases(&self) -> Vec<ScriptPhase> {
        self.scripts
            .iter()
            .map(|s| s.phase)
            .filter(|p| !p.is_sequential())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn check_unique<'a>(names: impl Iterator<Item = &'a str>) -> Result<(), DomainError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(DomainError::DuplicateSource(name.to_string()));
        }
    }
    Ok(())
}

/// The FFIEC catalog carried in code. This is the default when the project
/// configuration does not point at a catalog file.
pub fn builtin() -> SourceCatalog {
    let schema = "transformations";

    let import = |name: &str,
                  kind: MatchKind,
                  table: &str,
                  policy: ExistencePolicy,
                  sep: char,
                  cols: &[&str]| ImportSource {
        name: name.to_string(),
        match_kind: kind,
        destination_schema: schema.to_string(),
        destination_table: table.to_string(),
        existence_policy: policy,
        field_separator: sep,
        column_projection: cols.iter().map(|c| c.to_string()).collect(),
        enabled: true,
    };

    let imports = vec![
        // Quarterly holding-company feed, date-suffixed filename. Only the
        // identification and total-asset columns are staged.
        import(
            "bhcf",
            MatchKind::Prefix,
            "tmp_bhcf",
            ExistencePolicy::Fail,
            '^',
            &["RSSD9001", "RSSD9999", "BHCA2170"],
        ),
        // The three attribute extracts share one structure and accumulate
        // in tmp_attributes: replace, then append, then append. The
        // preflight script clears leftovers from an interrupted run.
        import(
            "csv_attributes_active",
            MatchKind::Exact,
            "tmp_attributes",
            ExistencePolicy::Replace,
            ',',
            &[],
        ),
        import(
            "csv_attributes_branches",
            MatchKind::Exact,
            "tmp_attributes",
            ExistencePolicy::Append,
            ',',
            &[],
        ),
        import(
            "csv_attributes_closed",
            MatchKind::Exact,
            "tmp_attributes",
            ExistencePolicy::Append,
            ',',
            &[],
        ),
        import(
            "csv_country_codes",
            MatchKind::Exact,
            "tmp_country_codes",
            ExistencePolicy::Fail,
            ',',
            &[],
        ),
        import(
            "csv_county_codes",
            MatchKind::Exact,
            "tmp_county_codes",
            ExistencePolicy::Replace,
            ',',
            &[],
        ),
        import(
            "csv_naics",
            MatchKind::Exact,
            "tmp_naics",
            ExistencePolicy::Replace,
            ',',
            &[],
        ),
        import(
            "csv_relationships",
            MatchKind::Exact,
            "tmp_relationships",
            ExistencePolicy::Replace,
            ',',
            &[],
        ),
        import(
            "csv_state_codes",
            MatchKind::Exact,
            "tmp_state_codes",
            ExistencePolicy::Replace,
            ',',
            &[],
        ),
        import(
            "csv_transformations",
            MatchKind::Exact,
            "tmp_transformations",
            ExistencePolicy::Replace,
            ',',
            &[],
        ),
    ];

    let script = |name: &str, phase: ScriptPhase, description: &str| ScriptSource {
        name: name.to_string(),
        phase,
        description: description.to_string(),
        enabled: true,
    };

    let mut scripts = vec![
        script(
            "001_preflight",
            ScriptPhase::Preflight,
            "fail safe mechanism to ensure there is no chance of duplicate data",
        ),
        script(
            "002_functions",
            ScriptPhase::Dependency,
            "creates reusable functions that are a dependency",
        ),
        script(
            "003_tables",
            ScriptPhase::Dependency,
            "creation of production tables if not exist",
        ),
        script(
            "004_tmp_tables",
            ScriptPhase::Dependency,
            "creation of tmp tables for transformation",
        ),
        script(
            "005_attributes_inst",
            ScriptPhase::Attributes,
            "transformation of csv_attributes",
        ),
        script(
            "006_attributes_ids",
            ScriptPhase::Attributes,
            "transformation of csv_attributes",
        ),
        script(
            "007_attributes_dates",
            ScriptPhase::Attributes,
            "transformation of csv_attributes",
        ),
        script(
            "008_attributes_inds",
            ScriptPhase::Attributes,
            "transformation of csv_attributes",
        ),
        script(
            "009_attributes_codes",
            ScriptPhase::Attributes,
            "transformation of csv_attributes",
        ),
        script(
            "010_attributes_load",
            ScriptPhase::Attributes,
            "loads transformed data into production tables",
        ),
        script(
            "011_relationships",
            ScriptPhase::Relationships,
            "transformation of csv_relationships",
        ),
        script(
            "012_relationships_load",
            ScriptPhase::Relationships,
            "loads transformed data into target table",
        ),
        script(
            "013_transformations",
            ScriptPhase::Transformations,
            "transformation of csv_transformations and loading to target table",
        ),
        script(
            "014_inst_addresses_load",
            ScriptPhase::Transformations,
            "transformation of institution physical addresses and loads to target table",
        ),
        script(
            "015_fips_load",
            ScriptPhase::GovIdentifiers,
            "transformation and load of statistical identification codes for county, state, and country",
        ),
        script(
            "016_naics",
            ScriptPhase::GovIdentifiers,
            "transformation and load of naics codes",
        ),
        script(
            "017_call_reports",
            ScriptPhase::CallReports,
            "loading of call report data",
        ),
    ];

    scripts.push(ScriptSource {
        name: "099_cleanup".to_string(),
        phase: ScriptPhase::Cleanup,
        description: "post script for dropping tmp tables and functions".to_string(),
        enabled: false,
    });

    // The builtin lists are hand-maintained; unique by construction.
    SourceCatalog { imports, scripts }
}
