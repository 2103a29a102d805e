//! Launcher profile store.
//!
//! Only `lastVersionId` is modeled. Every other field, at the top level and
//! inside each profile, is captured as raw JSON and written back as-is.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::LauncherError;

/// Contents of a launcher profile store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LauncherData {
    pub profiles: BTreeMap<String, Profile>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single launcher profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_version_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A profile store loaded from disk.
pub struct ProfileStore {
    path: PathBuf,
    data: LauncherData,
}

impl ProfileStore {
    /// Reads and parses the store at `path`.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, LauncherError> {
        let path = path.into();
        let content = fs::read_to_string(&path).map_err(|source| LauncherError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let data = serde_json::from_str(&content).map_err(|source| LauncherError::Json {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self { path, data })
    }

    /// Returns a mutable profile by id.
    pub fn profile_mut(&mut self, profile_id: &str) -> Option<&mut Profile> {
        self.data.profiles.get_mut(profile_id)
    }

    /// Writes the store back, pretty-printed with a trailing newline.
    pub fn save(&self) -> Result<(), LauncherError> {
        let mut buf =
            serde_json::to_string_pretty(&self.data).map_err(|source| LauncherError::Json {
                path: self.path.display().to_string(),
                source,
            })?;
        buf.push('\n');
        fs::write(&self.path, buf).map_err(|source| LauncherError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), "launcher profiles saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORE: &str = r#"{
        "profiles": {
            "abc123": {
                "lastVersionId": "1.19.4",
                "name": "Wurstmineberg",
                "type": "custom",
                "javaArgs": "-Xmx4G",
                "resolution": {"width": 1280, "height": 720}
            },
            "latest": {
                "name": "",
                "type": "latest-release"
            }
        },
        "settings": {"crashAssistance": true, "locale": "en-us"},
        "version": 3
    }"#;

    #[test]
    fn unknown_fields_survive_roundtrip() {
        let data: LauncherData = serde_json::from_str(STORE).unwrap();
        assert_eq!(
            data.profiles["abc123"].last_version_id.as_deref(),
            Some("1.19.4")
        );
        assert!(data.profiles["latest"].last_version_id.is_none());

        let original: Value = serde_json::from_str(STORE).unwrap();
        let reserialized = serde_json::to_value(&data).unwrap();
        assert_eq!(original, reserialized);
    }

    #[test]
    fn load_modify_save() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("launcher_profiles.json");
        fs::write(&path, STORE).unwrap();

        let mut store = ProfileStore::load(&path).unwrap();
        store.profile_mut("abc123").unwrap().last_version_id = Some("1.20".into());
        store.save().unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.ends_with('\n'));
        let value: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["profiles"]["abc123"]["lastVersionId"], "1.20");
        assert_eq!(value["profiles"]["abc123"]["resolution"]["width"], 1280);
        assert_eq!(value["settings"]["locale"], "en-us");
        assert_eq!(value["version"], 3);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = ProfileStore::load(tmp.path().join("nope.json")).err().unwrap();
        assert!(matches!(err, LauncherError::Io { .. }));
    }

    #[test]
    fn load_invalid_json_is_json_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("launcher_profiles.json");
        fs::write(&path, "{\"profiles\": 5}").unwrap();
        let err = ProfileStore::load(&path).err().unwrap();
        assert!(matches!(err, LauncherError::Json { .. }));
    }
}
