pub mod constants;
pub mod types;

// Re-export primary types for convenience.
pub use constants::{person_profile_url, version_reference_url};
pub use types::{PeopleFile, Person, Roster, Uid, WorldStatus, WorldStatusSet};
