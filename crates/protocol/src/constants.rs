use std::time::Duration;

/// Base URL of the v3 API.
pub const DEFAULT_BASE_URL: &str = "https://wurstmineberg.de/api/v3";

/// Name of the main world. Single-world deployments report under this name
/// unless configured otherwise.
pub const MAIN_WORLD: &str = "wurstmineberg";

/// Time between two scheduled refresh cycles.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(45);

/// Timeout for a single HTTP request, including reading the body.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Only people file version understood by this client.
pub const PEOPLE_FILE_VERSION: u8 = 3;

/// Tooltip shown before the first refresh cycle completes.
pub const LOADING_TOOLTIP: &str = "Wurstmineberg: Loading…";

/// Returns the wiki article describing a Java Edition release.
pub fn version_reference_url(version: &str) -> String {
    format!("https://minecraft.wiki/w/Java_Edition_{version}")
}

/// Returns the public profile page of a person.
pub fn person_profile_url(uid: &str) -> String {
    format!("https://wurstmineberg.de/people/{uid}")
}
