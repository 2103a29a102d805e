//! Presence aggregation.
//!
//! Merges the people roster with world statuses into a [`PresentationState`]
//! and derives the tray's visibility and tooltip from it. Everything here is
//! pure; fetching and rendering live elsewhere.

mod aggregate;
mod summary;

pub use aggregate::{OnlinePerson, PresentationState, WorldPresence, aggregate, remove_ignored};
pub use summary::{VisibilityPolicy, tooltip};
