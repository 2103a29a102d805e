//! Tray visibility and tooltip text.

use worldtray_protocol::constants::MAIN_WORLD;

use crate::aggregate::PresentationState;

/// Decides whether the tray icon is shown.
///
/// With both flags off (the default) the icon is visible exactly when
/// somebody is online.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityPolicy {
    /// World whose running state the two flags refer to.
    pub main_world: String,
    /// Also show the icon while the main world runs with nobody online.
    pub show_if_empty: bool,
    /// Also show the icon while the main world is stopped.
    pub show_if_offline: bool,
}

impl Default for VisibilityPolicy {
    fn default() -> Self {
        Self {
            main_world: MAIN_WORLD.into(),
            show_if_empty: false,
            show_if_offline: false,
        }
    }
}

impl VisibilityPolicy {
    pub fn is_visible(&self, state: &PresentationState) -> bool {
        if state.total_online > 0 {
            return true;
        }
        match state.world(&self.main_world) {
            Some(main) if main.running => self.show_if_empty,
            Some(_) => self.show_if_offline,
            None => false,
        }
    }
}

/// Tooltip for a successful refresh.
pub fn tooltip(state: &PresentationState) -> String {
    match &state.single_online {
        Some(person) => format!("{} is online", person.display_name),
        None => format!("{} players are online", state.total_online),
    }
}
