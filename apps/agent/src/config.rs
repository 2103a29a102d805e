//! Agent configuration management.
//!
//! Configuration is stored as JSON in the user data directory:
//! - Linux: `~/.local/share/Wurstmineberg/config.json`
//! - Windows: `%APPDATA%/Wurstmineberg/config.json`
//!
//! A missing file is not an error; every field has a default.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use worldtray_api::WorldSource;
use worldtray_launcher::{LauncherError, ProfileStorePaths, VersionMatchRule};
use worldtray_presence::VisibilityPolicy;
use worldtray_protocol::Uid;
use worldtray_protocol::constants::{DEFAULT_BASE_URL, MAIN_WORLD};

/// Agent configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Which status endpoint to poll.
    #[serde(default)]
    pub worlds: WorldSource,

    /// World the visibility flags refer to.
    #[serde(default = "default_main_world")]
    pub main_world: String,

    /// Players never shown as online.
    #[serde(default)]
    pub ignored_players: Vec<Uid>,

    /// Launch the game on left click.
    #[serde(default = "default_true")]
    pub left_click_launch: bool,

    /// Show the icon while the main world runs with nobody online.
    #[serde(default)]
    pub show_if_empty: bool,

    /// Show the icon while the main world is stopped.
    #[serde(default)]
    pub show_if_offline: bool,

    /// Launcher profile id → world name whose version it should follow.
    #[serde(default)]
    pub version_match: HashMap<String, String>,

    /// Launcher game directory, if not the platform default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_dir: Option<PathBuf>,

    /// Prism Launcher instance to show instead of the instance list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prism_instance: Option<String>,

    #[serde(default)]
    pub ferium: Ferium,

    #[serde(default)]
    pub portablemc: PortableMc,
}

/// Configuration for <https://github.com/gorilla-devs/ferium>.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ferium {
    /// World name → ferium profile whose mods are upgraded before launch.
    #[serde(default)]
    pub profiles: HashMap<String, String>,

    /// Game version to launch instead of the one the main world reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_override: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
}

/// Configuration for <https://pypi.org/project/portablemc/>.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortableMc {
    /// Login email address. If set, the game is launched using portablemc.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_main_world() -> String {
    MAIN_WORLD.into()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            worlds: WorldSource::default(),
            main_world: default_main_world(),
            ignored_players: Vec::new(),
            left_click_launch: default_true(),
            show_if_empty: false,
            show_if_offline: false,
            version_match: HashMap::new(),
            game_dir: None,
            prism_instance: None,
            ferium: Ferium::default(),
            portablemc: PortableMc::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the default location.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Loads configuration from `path`, or the defaults if it does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let config = serde_json::from_str(&content)?;
                tracing::debug!(path = %path.display(), "configuration loaded");
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Version match rules in a stable order.
    pub fn version_rules(&self) -> Vec<VersionMatchRule> {
        VersionMatchRule::from_map(&self.version_match)
    }

    pub fn visibility_policy(&self) -> VisibilityPolicy {
        VisibilityPolicy {
            main_world: self.main_world.clone(),
            show_if_empty: self.show_if_empty,
            show_if_offline: self.show_if_offline,
        }
    }

    /// Candidate launcher profile store locations.
    pub fn profile_store_paths(&self) -> Result<ProfileStorePaths, LauncherError> {
        match &self.game_dir {
            Some(dir) => Ok(ProfileStorePaths::with_game_dir(dir)),
            None => ProfileStorePaths::new(),
        }
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| anyhow::anyhow!("failed to find user folder"))?;
    Ok(data_dir.join("Wurstmineberg").join("config.json"))
}
