//! Keeps launcher profiles on the version a world reports.

use std::collections::HashMap;
use std::path::Path;

use worldtray_protocol::WorldStatusSet;

use crate::LauncherError;
use crate::profiles::ProfileStore;

/// Pins a launcher profile to a world's version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMatchRule {
    pub profile_id: String,
    pub world_name: String,
}

impl VersionMatchRule {
    /// Builds rules from a profile id → world name mapping, sorted by profile id.
    pub fn from_map(map: &HashMap<String, String>) -> Vec<Self> {
        let mut rules: Vec<Self> = map
            .iter()
            .map(|(profile_id, world_name)| Self {
                profile_id: profile_id.clone(),
                world_name: world_name.clone(),
            })
            .collect();
        rules.sort_by(|a, b| a.profile_id.cmp(&b.profile_id));
        rules
    }
}

/// A rule that cannot be applied with the current data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("no profile named “{0}” in launcher data")]
    UnknownProfile(String),

    #[error("profile “{profile_id}” is matched to unknown world “{world}”")]
    UnknownWorld { profile_id: String, world: String },
}

/// Outcome of a [`sync`] run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Profiles whose `lastVersionId` changed.
    pub updated: Vec<String>,
    /// Whether the store was written back.
    pub written: bool,
    /// Rules that were skipped.
    pub errors: Vec<ConfigError>,
}

/// Applies `rules` to the store at `path`.
///
/// The file is only written when at least one profile changed. A rule naming
/// an unknown profile or world is reported in [`SyncReport::errors`] and does
/// not stop the remaining rules.
pub fn sync(
    rules: &[VersionMatchRule],
    statuses: &WorldStatusSet,
    path: &Path,
) -> Result<SyncReport, LauncherError> {
    let mut store = ProfileStore::load(path)?;
    let mut report = SyncReport::default();

    for rule in rules {
        let Some(status) = statuses.get(&rule.world_name) else {
            report.errors.push(ConfigError::UnknownWorld {
                profile_id: rule.profile_id.clone(),
                world: rule.world_name.clone(),
            });
            continue;
        };
        let Some(profile) = store.profile_mut(&rule.profile_id) else {
            report
                .errors
                .push(ConfigError::UnknownProfile(rule.profile_id.clone()));
            continue;
        };
        // Modded servers may not report a version; leave the profile alone.
        let Some(version) = &status.version else {
            continue;
        };
        if profile.last_version_id.as_ref() != Some(version) {
            tracing::info!(
                profile = %rule.profile_id,
                world = %rule.world_name,
                from = profile.last_version_id.as_deref().unwrap_or(""),
                to = %version,
                "updating launcher profile version"
            );
            profile.last_version_id = Some(version.clone());
            report.updated.push(rule.profile_id.clone());
        }
    }

    if !report.updated.is_empty() {
        store.save()?;
        report.written = true;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use worldtray_protocol::WorldStatus;

    const STORE: &str = r#"{
  "profiles": {
    "wmb": {"lastVersionId": "1.19.4", "name": "Wurstmineberg", "icon": "Grass"},
    "creative": {"lastVersionId": "1.20", "name": "Creative"}
  },
  "settings": {"keepLauncherOpen": false}
}
"#;

    fn statuses(main_version: Option<&str>) -> WorldStatusSet {
        WorldStatusSet::from([
            (
                "wurstmineberg".to_string(),
                WorldStatus {
                    version: main_version.map(str::to_string),
                    running: true,
                    list: vec![],
                },
            ),
            (
                "creative".to_string(),
                WorldStatus {
                    version: Some("1.20".into()),
                    running: false,
                    list: vec![],
                },
            ),
        ])
    }

    fn rule(profile_id: &str, world_name: &str) -> VersionMatchRule {
        VersionMatchRule {
            profile_id: profile_id.into(),
            world_name: world_name.into(),
        }
    }

    fn write_store(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("launcher_profiles.json");
        fs::write(&path, STORE).unwrap();
        path
    }

    #[test]
    fn updates_mismatched_version() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_store(tmp.path());

        let report = sync(&[rule("wmb", "wurstmineberg")], &statuses(Some("1.20.4")), &path).unwrap();
        assert_eq!(report.updated, vec!["wmb".to_string()]);
        assert!(report.written);
        assert!(report.errors.is_empty());

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["profiles"]["wmb"]["lastVersionId"], "1.20.4");
        assert_eq!(value["profiles"]["wmb"]["icon"], "Grass");
        assert_eq!(value["settings"]["keepLauncherOpen"], false);
    }

    #[test]
    fn second_sync_does_not_write() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_store(tmp.path());
        let rules = [rule("wmb", "wurstmineberg")];
        let statuses = statuses(Some("1.20.4"));

        let first = sync(&rules, &statuses, &path).unwrap();
        assert!(first.written);
        let after_first = fs::read_to_string(&path).unwrap();

        let second = sync(&rules, &statuses, &path).unwrap();
        assert!(!second.written);
        assert!(second.updated.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), after_first);
    }

    #[test]
    fn matching_version_leaves_file_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_store(tmp.path());

        let report = sync(&[rule("creative", "creative")], &statuses(Some("1.20.4")), &path).unwrap();
        assert!(!report.written);
        assert_eq!(fs::read_to_string(&path).unwrap(), STORE);
    }

    #[test]
    fn unknown_profile_and_world_reported_without_aborting() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_store(tmp.path());
        let rules = [
            rule("ghost", "wurstmineberg"),
            rule("creative", "nether-hub"),
            rule("wmb", "wurstmineberg"),
        ];

        let report = sync(&rules, &statuses(Some("1.21")), &path).unwrap();
        assert_eq!(
            report.errors,
            vec![
                ConfigError::UnknownProfile("ghost".into()),
                ConfigError::UnknownWorld {
                    profile_id: "creative".into(),
                    world: "nether-hub".into(),
                },
            ]
        );
        assert_eq!(report.updated, vec!["wmb".to_string()]);
        assert!(report.written);
    }

    #[test]
    fn missing_world_version_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_store(tmp.path());

        let report = sync(&[rule("wmb", "wurstmineberg")], &statuses(None), &path).unwrap();
        assert!(report.errors.is_empty());
        assert!(!report.written);
    }

    #[test]
    fn rules_from_map_are_sorted() {
        let map = HashMap::from([
            ("zeta".to_string(), "wurstmineberg".to_string()),
            ("alpha".to_string(), "creative".to_string()),
        ]);
        let rules = VersionMatchRule::from_map(&map);
        assert_eq!(rules, vec![rule("alpha", "creative"), rule("zeta", "wurstmineberg")]);
    }
}
