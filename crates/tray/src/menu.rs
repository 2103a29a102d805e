//! Dynamic context menu for the system tray.

use std::fmt;

use worldtray_presence::PresentationState;
use worldtray_protocol::{person_profile_url, version_reference_url};

/// Actions that can be triggered from the tray context menu.
///
/// These are descriptors only; the agent decides how to carry them out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Open a page in the default browser.
    OpenUrl(String),
    /// Start the game.
    LaunchGame,
    /// User requested to quit the application.
    Exit,
}

/// A single clickable or informational menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Display text.
    pub label: String,
    /// Whether the item is enabled (clickable).
    pub enabled: bool,
    /// Optional action triggered on click.
    pub action: Option<MenuAction>,
}

/// One row of the context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Item(MenuItem),
    Separator,
}

impl MenuEntry {
    /// A disabled, informational item.
    pub fn label(text: impl Into<String>) -> Self {
        Self::Item(MenuItem {
            label: text.into(),
            enabled: false,
            action: None,
        })
    }

    /// An enabled item that triggers `action`.
    pub fn action(text: impl Into<String>, action: MenuAction) -> Self {
        Self::Item(MenuItem {
            label: text.into(),
            enabled: true,
            action: Some(action),
        })
    }

    /// Returns the item, or `None` for a separator.
    pub fn item(&self) -> Option<&MenuItem> {
        match self {
            Self::Item(item) => Some(item),
            Self::Separator => None,
        }
    }
}

/// A complete context menu, top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuTree {
    pub entries: Vec<MenuEntry>,
}

impl MenuTree {
    /// Menu shown before any data has arrived: only the static actions.
    pub fn loading() -> Self {
        let mut tree = Self::default();
        tree.push_static_actions();
        tree
    }

    /// Menu shown when a refresh failed: a single entry describing the error.
    pub fn from_error(err: &dyn fmt::Display) -> Self {
        Self {
            entries: vec![MenuEntry::label(err.to_string())],
        }
    }

    /// Labels of all items, skipping separators.
    pub fn labels(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(MenuEntry::item)
            .map(|item| item.label.as_str())
            .collect()
    }

    fn push_static_actions(&mut self) {
        self.entries
            .push(MenuEntry::action("Start Minecraft", MenuAction::LaunchGame));
        self.entries.push(MenuEntry::action("Exit", MenuAction::Exit));
    }
}

/// Builds the context menu for a successful refresh.
///
/// Each world gets a section: its name (only when there is more than one
/// world), its version, an offline marker when stopped, one entry per online
/// player, and a closing separator. The static actions come last.
pub fn synthesize(state: &PresentationState) -> MenuTree {
    let mut tree = MenuTree::default();
    let show_world_names = state.worlds.len() != 1;

    for world in &state.worlds {
        if show_world_names {
            tree.entries.push(MenuEntry::label(&world.name));
        }

        match &world.version {
            Some(version) => tree.entries.push(MenuEntry::action(
                format!("Version: {version}"),
                MenuAction::OpenUrl(version_reference_url(version)),
            )),
            None => tree
                .entries
                .push(MenuEntry::label("Modded Server, Unknown Version")),
        }

        if world.is_offline() {
            tree.entries.push(MenuEntry::label("Server offline"));
        }

        for person in &world.online {
            tree.entries.push(MenuEntry::action(
                &person.display_name,
                MenuAction::OpenUrl(person_profile_url(person.uid.as_str())),
            ));
        }

        tree.entries.push(MenuEntry::Separator);
    }

    tree.push_static_actions();
    tree
}
