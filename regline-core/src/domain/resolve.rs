// regline-core/src/domain/resolve.rs
//
// Pure matching of logical sources against a directory listing snapshot.
// The snapshot (file stem -> absolute path) is computed once per directory
// per run and shared by every source targeting that directory, so that all
// sources in one phase see the same view of the disk.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::domain::source::{ImportSource, MatchKind, ResolvedFile, ScriptSource};

/// Fixed width of the `Prefix` match rule.
///
/// Inherited verbatim from the legacy loader: the first 4 characters of the
/// stem are compared against the WHOLE source name, regardless of that
/// name's length. Correct for the 4-letter feeds it was written for
/// (`bhcf` -> `bhcf20240630.csv`); do not generalize without checking the
/// real catalogs.
const PREFIX_WIDTH: usize = 4;

/// Anything the resolver can match against the filesystem.
pub trait Resolvable {
    fn source_name(&self) -> &str;
    fn match_kind(&self) -> MatchKind;
}

impl Resolvable for ImportSource {
    fn source_name(&self) -> &str {
        &self.name
    }
    fn match_kind(&self) -> MatchKind {
        self.match_kind
    }
}

impl Resolvable for ScriptSource {
    fn source_name(&self) -> &str {
        &self.name
    }
    // Scripts are always matched by their exact file stem.
    fn match_kind(&self) -> MatchKind {
        MatchKind::Exact
    }
}

/// Matches every source against the shared listing snapshot.
///
/// When several files match one source, the last match in listing order
/// wins. The listing is a `BTreeMap`, so "last" is the lexicographically
/// greatest stem — for date-suffixed feeds that is the newest extract, and
/// the choice is deterministic across platforms.
pub fn resolve<S: Resolvable>(
    sources: &[S],
    listing: &BTreeMap<String, PathBuf>,
) -> Vec<ResolvedFile> {
    sources
        .iter()
        .map(|source| resolve_one(source, listing))
        .collect()
}

fn resolve_one<S: Resolvable>(source: &S, listing: &BTreeMap<String, PathBuf>) -> ResolvedFile {
    let name = source.source_name().to_lowercase();
    let mut found: Option<&PathBuf> = None;

    for (stem, path) in listing {
        let stem = stem.to_lowercase();
        let matched = match source.match_kind() {
            MatchKind::Exact => stem == name,
            MatchKind::Prefix => {
                let prefix: String = stem.chars().take(PREFIX_WIDTH).collect();
                prefix == name
            }
        };
        if matched {
            found = Some(path);
        }
    }

    ResolvedFile {
        source_name: source.source_name().to_string(),
        absolute_path: found.cloned(),
        match_kind: source.match_kind(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::source::{ExistencePolicy, ScriptPhase};

    fn import(name: &str, kind: MatchKind) -> ImportSource {
        ImportSource {
            name: name.to_string(),
            match_kind: kind,
            destination_schema: "transformations".into(),
            destination_table: format!("tmp_{name}"),
            existence_policy: ExistencePolicy::Replace,
            field_separator: ',',
            column_projection: vec![],
            enabled: true,
        }
    }

    fn listing(stems: &[&str]) -> BTreeMap<String, PathBuf> {
        stems
            .iter()
            .map(|s| (s.to_string(), PathBuf::from(format!("/data/{s}.csv"))))
            .collect()
    }

    #[test]
    fn test_exact_match_case_folded() {
        let sources = vec![import("csv_naics", MatchKind::Exact)];
        let resolved = resolve(&sources, &listing(&["CSV_NAICS", "csv_other"]));
        assert_eq!(
            resolved[0].absolute_path,
            Some(PathBuf::from("/data/CSV_NAICS.csv"))
        );
    }

    #[test]
    fn test_exact_requires_full_stem() {
        let sources = vec![import("csv_naics", MatchKind::Exact)];
        let resolved = resolve(&sources, &listing(&["csv_naics_2024"]));
        assert_eq!(resolved[0].absolute_path, None);
    }

    #[test]
    fn test_prefix_matches_date_suffixed_stem() {
        let sources = vec![import("bhcf", MatchKind::Prefix)];
        let resolved = resolve(&sources, &listing(&["bhcf20240630"]));
        assert_eq!(
            resolved[0].absolute_path,
            Some(PathBuf::from("/data/bhcf20240630.csv"))
        );
    }

    #[test]
    fn test_prefix_last_match_wins_sorted() {
        // Two quarterly extracts present: the newest (greatest stem) wins.
        let sources = vec![import("bhcf", MatchKind::Prefix)];
        let resolved = resolve(&sources, &listing(&["bhcf20231231", "bhcf20240630"]));
        assert_eq!(
            resolved[0].absolute_path,
            Some(PathBuf::from("/data/bhcf20240630.csv"))
        );
    }

    #[test]
    fn test_prefix_is_fixed_width_quirk() {
        // A 3-letter source never prefix-matches: the rule compares the
        // first 4 stem chars against the whole name.
        let sources = vec![import("fed", MatchKind::Prefix)];
        let resolved = resolve(&sources, &listing(&["fed20240630"]));
        assert_eq!(resolved[0].absolute_path, None);
    }

    #[test]
    fn test_zero_matches_resolve_to_none() {
        let sources = vec![import("bhcf", MatchKind::Prefix)];
        let resolved = resolve(&sources, &listing(&["other"]));
        assert_eq!(resolved[0].source_name, "bhcf");
        assert!(!resolved[0].is_resolved());
    }

    #[test]
    fn test_script_sources_match_exact() {
        let script = ScriptSource {
            name: "001_preflight".into(),
            phase: ScriptPhase::Preflight,
            description: String::new(),
            enabled: true,
        };
        let mut files = BTreeMap::new();
        files.insert(
            "001_preflight".to_string(),
            PathBuf::from("/scripts/001_preflight.sql"),
        );
        let resolved = resolve(&[script], &files);
        assert_eq!(
            resolved[0].absolute_path,
            Some(PathBuf::from("/scripts/001_preflight.sql"))
        );
    }
}
