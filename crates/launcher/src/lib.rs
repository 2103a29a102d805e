pub mod paths;
pub mod profiles;
pub mod sync;

// Re-export primary types.
pub use paths::ProfileStorePaths;
pub use profiles::{LauncherData, Profile, ProfileStore};
pub use sync::{ConfigError, SyncReport, VersionMatchRule, sync};

/// Errors for launcher profile store operations.
#[derive(Debug, thiserror::Error)]
pub enum LauncherError {
    #[error("user data directory not found")]
    DataDirNotFound,

    #[error("launcher profile store not found (tried {primary} and {fallback})")]
    StoreNotFound { primary: String, fallback: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid launcher profile store {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
