use std::path::{Path, PathBuf};

use crate::LauncherError;

/// Store written by the Microsoft Store edition of the launcher.
const MICROSOFT_STORE_FILE: &str = "launcher_profiles_microsoft_store.json";

/// Store written by the standalone launcher.
const STANDALONE_FILE: &str = "launcher_profiles.json";

/// Candidate locations of the launcher profile store.
pub struct ProfileStorePaths {
    game_dir: PathBuf,
}

impl ProfileStorePaths {
    /// Creates a `ProfileStorePaths` for the platform's default game directory.
    pub fn new() -> Result<Self, LauncherError> {
        Ok(Self {
            game_dir: default_game_dir()?,
        })
    }

    /// Creates a `ProfileStorePaths` with a custom game directory.
    pub fn with_game_dir(game_dir: impl Into<PathBuf>) -> Self {
        Self {
            game_dir: game_dir.into(),
        }
    }

    /// Returns the game directory.
    pub fn game_dir(&self) -> &Path {
        &self.game_dir
    }

    /// Returns the preferred store path.
    pub fn primary(&self) -> PathBuf {
        self.game_dir.join(MICROSOFT_STORE_FILE)
    }

    /// Returns the store path tried when the preferred one is absent.
    pub fn fallback(&self) -> PathBuf {
        self.game_dir.join(STANDALONE_FILE)
    }

    /// Returns the first candidate that exists.
    pub fn resolve(&self) -> Result<PathBuf, LauncherError> {
        let primary = self.primary();
        if primary.exists() {
            return Ok(primary);
        }
        let fallback = self.fallback();
        if fallback.exists() {
            return Ok(fallback);
        }
        Err(LauncherError::StoreNotFound {
            primary: primary.display().to_string(),
            fallback: fallback.display().to_string(),
        })
    }
}

/// Returns the launcher's default game directory.
fn default_game_dir() -> Result<PathBuf, LauncherError> {
    #[cfg(target_os = "windows")]
    {
        dirs::data_dir()
            .map(|dir| dir.join(".minecraft"))
            .ok_or(LauncherError::DataDirNotFound)
    }

    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|dir| dir.join("minecraft"))
            .ok_or(LauncherError::DataDirNotFound)
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        dirs::home_dir()
            .map(|dir| dir.join(".minecraft"))
            .ok_or(LauncherError::DataDirNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn candidate_paths() {
        let paths = ProfileStorePaths::with_game_dir("/games/.minecraft");
        assert_eq!(
            paths.primary(),
            PathBuf::from("/games/.minecraft/launcher_profiles_microsoft_store.json")
        );
        assert_eq!(
            paths.fallback(),
            PathBuf::from("/games/.minecraft/launcher_profiles.json")
        );
    }

    #[test]
    fn resolve_prefers_primary() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = ProfileStorePaths::with_game_dir(tmp.path());
        fs::write(paths.primary(), "{}").unwrap();
        fs::write(paths.fallback(), "{}").unwrap();
        assert_eq!(paths.resolve().unwrap(), paths.primary());
    }

    #[test]
    fn resolve_falls_back_when_primary_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = ProfileStorePaths::with_game_dir(tmp.path());
        fs::write(paths.fallback(), "{}").unwrap();
        assert_eq!(paths.resolve().unwrap(), paths.fallback());
    }

    #[test]
    fn resolve_fails_when_both_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = ProfileStorePaths::with_game_dir(tmp.path());
        let err = paths.resolve().unwrap_err();
        assert!(matches!(err, LauncherError::StoreNotFound { .. }));
        assert!(err.to_string().contains("launcher_profiles.json"));
    }
}
