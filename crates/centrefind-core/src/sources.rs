use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Accepted header names per logical field, tried in order.
///
/// Headers are matched trimmed and case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub facility_id: Vec<String>,
    pub address: Vec<String>,
    pub latitude: Vec<String>,
    pub longitude: Vec<String>,
    pub status: Vec<String>,
    pub city: Vec<String>,
    pub region: Vec<String>,
    pub postal_code: Vec<String>,
    pub facility_type: Vec<String>,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            facility_id: names(&["Centre Number", "Centre #", "facility_id"]),
            address: names(&["Addresses", "Address"]),
            latitude: names(&["Latitude"]),
            longitude: names(&["Longitude"]),
            status: names(&["Transaction Status", "Status"]),
            city: names(&["City"]),
            region: names(&["State", "Region", "County"]),
            postal_code: names(&["Postcode", "Post Code", "Zip"]),
            facility_type: names(&["Centre Type", "Type"]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    /// CSV path; relative paths are resolved against the sources file directory.
    pub path: PathBuf,
    #[serde(default)]
    pub columns: Option<ColumnMapping>,
}

impl SourceConfig {
    #[must_use]
    pub fn column_mapping(&self) -> ColumnMapping {
        self.columns.clone().unwrap_or_default()
    }
}

/// Switches for the individually optional consolidation steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyToggles {
    /// Drop duplicate rows without a usable address when a sibling has one.
    pub prefer_valid_address: bool,
    /// Overwrite the surviving status from the status source.
    pub status_override: bool,
    /// Narrow `(id, address)` groups to preferred statuses before picking.
    pub preferred_status_pass: bool,
}

impl Default for PolicyToggles {
    fn default() -> Self {
        Self {
            prefer_valid_address: true,
            status_override: true,
            preferred_status_pass: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesFile {
    /// Sources in priority order; the first entry wins duplicate conflicts.
    pub sources: Vec<SourceConfig>,
    /// Source whose statuses are treated as freshest. Defaults to the first source.
    #[serde(default)]
    pub status_source: Option<String>,
    #[serde(default)]
    pub preferred_statuses: Vec<String>,
    #[serde(default)]
    pub policy: PolicyToggles,
}

impl SourcesFile {
    #[must_use]
    pub fn consolidation_policy(&self) -> ConsolidationPolicy {
        ConsolidationPolicy {
            source_priority: self.sources.iter().map(|s| s.name.clone()).collect(),
            status_source: self.status_source.clone(),
            preferred_statuses: self.preferred_statuses.clone(),
            toggles: self.policy,
        }
    }
}

/// Everything the consolidator needs to resolve duplicate facilities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationPolicy {
    /// Source names, most authoritative first.
    pub source_priority: Vec<String>,
    pub status_source: Option<String>,
    pub preferred_statuses: Vec<String>,
    pub toggles: PolicyToggles,
}

impl ConsolidationPolicy {
    #[must_use]
    pub fn new(source_priority: Vec<String>) -> Self {
        Self {
            source_priority,
            ..Self::default()
        }
    }

    /// Priority rank of a source; unknown sources rank after every listed one.
    #[must_use]
    pub fn priority_of(&self, source: &str) -> usize {
        self.source_priority
            .iter()
            .position(|s| s == source)
            .unwrap_or(self.source_priority.len())
    }

    /// The source whose statuses override, if any.
    #[must_use]
    pub fn effective_status_source(&self) -> Option<&str> {
        self.status_source
            .as_deref()
            .or_else(|| self.source_priority.first().map(String::as_str))
    }

    #[must_use]
    pub fn is_preferred_status(&self, status: &str) -> bool {
        let status = status.trim();
        self.preferred_statuses
            .iter()
            .any(|p| p.trim().eq_ignore_ascii_case(status))
    }
}

/// Load and validate the sources configuration from a YAML file.
///
/// Relative source paths are rewritten to be relative to the YAML file's
/// directory so the file can be moved together with its data.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sources(path: &Path) -> Result<SourcesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut sources_file: SourcesFile =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::YamlParse {
            path: path.display().to_string(),
            source: e,
        })?;

    validate_sources(&sources_file)?;

    if let Some(base) = path.parent() {
        for source in &mut sources_file.sources {
            if source.path.is_relative() {
                source.path = base.join(&source.path);
            }
        }
    }

    Ok(sources_file)
}

fn validate_sources(sources_file: &SourcesFile) -> Result<(), ConfigError> {
    if sources_file.sources.is_empty() {
        return Err(ConfigError::Validation(
            "at least one source must be listed".to_string(),
        ));
    }

    let mut seen_names = HashSet::new();
    for source in &sources_file.sources {
        if source.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "source name must be non-empty".to_string(),
            ));
        }
        if !seen_names.insert(source.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate source name: '{}'",
                source.name
            )));
        }
        if let Some(columns) = &source.columns {
            for (field, list) in [
                ("facility_id", &columns.facility_id),
                ("latitude", &columns.latitude),
                ("longitude", &columns.longitude),
            ] {
                if list.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "source '{}' maps no header names to required column {field}",
                        source.name
                    )));
                }
            }
        }
    }

    if let Some(status_source) = &sources_file.status_source {
        if !seen_names.contains(status_source.as_str()) {
            return Err(ConfigError::Validation(format!(
                "status_source '{status_source}' is not a listed source"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> SourcesFile {
        serde_yaml::from_str(yaml).expect("valid yaml")
    }

    const SAMPLE: &str = r"
sources:
  - name: Comps
    path: comps.csv
  - name: Active Centre
    path: active.csv
  - name: Centre Opened
    path: /data/opened.csv
status_source: Active Centre
preferred_statuses: [Open, Active]
";

    #[test]
    fn sample_parses_with_default_toggles() {
        let file = parse(SAMPLE);
        assert_eq!(file.sources.len(), 3);
        assert_eq!(file.policy, PolicyToggles::default());
        assert!(file.sources[0].columns.is_none());
        assert!(validate_sources(&file).is_ok());
    }

    #[test]
    fn policy_priority_follows_list_order() {
        let policy = parse(SAMPLE).consolidation_policy();
        assert_eq!(policy.priority_of("Comps"), 0);
        assert_eq!(policy.priority_of("Active Centre"), 1);
        assert_eq!(policy.priority_of("Centre Opened"), 2);
        assert_eq!(policy.priority_of("Unknown"), 3);
    }

    #[test]
    fn status_source_defaults_to_first_source() {
        let mut file = parse(SAMPLE);
        file.status_source = None;
        let policy = file.consolidation_policy();
        assert_eq!(policy.effective_status_source(), Some("Comps"));
    }

    #[test]
    fn explicit_status_source_wins() {
        let policy = parse(SAMPLE).consolidation_policy();
        assert_eq!(policy.effective_status_source(), Some("Active Centre"));
    }

    #[test]
    fn preferred_status_is_case_insensitive_and_trimmed() {
        let policy = parse(SAMPLE).consolidation_policy();
        assert!(policy.is_preferred_status(" open "));
        assert!(policy.is_preferred_status("ACTIVE"));
        assert!(!policy.is_preferred_status("Closed"));
    }

    #[test]
    fn partial_column_override_keeps_defaults() {
        let file = parse(
            r"
sources:
  - name: Comps
    path: comps.csv
    columns:
      facility_id: [Site Code]
",
        );
        let mapping = file.sources[0].column_mapping();
        assert_eq!(mapping.facility_id, vec!["Site Code".to_string()]);
        assert_eq!(mapping.latitude, vec!["Latitude".to_string()]);
    }

    #[test]
    fn partial_policy_override_keeps_defaults() {
        let file = parse(
            r"
sources:
  - name: Comps
    path: comps.csv
policy:
  status_override: false
",
        );
        assert!(!file.policy.status_override);
        assert!(file.policy.prefer_valid_address);
        assert!(file.policy.preferred_status_pass);
    }

    #[test]
    fn validate_rejects_empty_source_list() {
        let file = parse("sources: []");
        let err = validate_sources(&file).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn validate_rejects_duplicate_names() {
        let file = parse(
            r"
sources:
  - name: Comps
    path: a.csv
  - name: Comps
    path: b.csv
",
        );
        let err = validate_sources(&file).unwrap_err();
        assert!(err.to_string().contains("duplicate source name"));
    }

    #[test]
    fn validate_rejects_blank_name() {
        let file = parse(
            r"
sources:
  - name: '  '
    path: a.csv
",
        );
        assert!(validate_sources(&file).is_err());
    }

    #[test]
    fn validate_rejects_unknown_status_source() {
        let mut file = parse(SAMPLE);
        file.status_source = Some("Missing".to_string());
        let err = validate_sources(&file).unwrap_err();
        assert!(err.to_string().contains("Missing"));
    }

    #[test]
    fn validate_rejects_empty_required_mapping() {
        let file = parse(
            r"
sources:
  - name: Comps
    path: a.csv
    columns:
      latitude: []
",
        );
        let err = validate_sources(&file).unwrap_err();
        assert!(err.to_string().contains("latitude"));
    }

    #[test]
    fn load_sources_resolves_relative_paths() {
        let dir = std::env::temp_dir().join(format!(
            "centrefind-sources-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("sources.yaml");
        std::fs::write(&path, SAMPLE).expect("write yaml");

        let file = load_sources(&path).expect("load");
        assert_eq!(file.sources[0].path, dir.join("comps.csv"));
        assert_eq!(file.sources[2].path, PathBuf::from("/data/opened.csv"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn load_sources_from_shipped_config() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("sources.yaml");
        let file = load_sources(&path).expect("shipped sources.yaml should load");
        let policy = file.consolidation_policy();
        assert_eq!(policy.effective_status_source(), Some("Centre Active"));
        assert!(policy.is_preferred_status("trading"));
    }

    #[test]
    fn load_sources_missing_file_is_io_error() {
        let err = load_sources(Path::new("/nonexistent/centrefind/sources.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileIo { .. }));
    }
}
