//! System tray presentation for worldtray.
//!
//! Turns a presentation state into a context menu and carries tray updates
//! to whichever thread owns the real tray icon.
//!
//! The tray communicates with the agent core via channels:
//! - [`TrayEvent`]: user interaction, from tray to agent
//! - [`TrayUpdate`]: icon, tooltip, menu and visibility, from agent to tray
//!
//! Every update carries the [`Tick`] of the refresh cycle that produced it.
//! [`TrayModel`] applies them last-write-wins by tick, so a late update from
//! an older cycle never replaces a newer one.
//!
//! # Platform notes
//! - Windows: the light/dark theme is read from the registry
//! - The tray event loop must run on the main thread on some platforms

mod icon;
mod menu;
mod tray;

pub use icon::{IconSize, IconTheme, IconVariant};
pub use menu::{MenuAction, MenuEntry, MenuItem, MenuTree, synthesize};
pub use tray::{PresentationSink, Tick, TrayEvent, TrayHandle, TrayModel, TraySink, TrayUpdate};
