//! Tray handle, events, and update types.
//!
//! The actual system tray implementation depends on platform-specific GUI
//! crates. This module defines the channel-based interface the agent core
//! uses to drive the tray, independent of the GUI backend.

use std::sync::mpsc;

use worldtray_protocol::constants::LOADING_TOOLTIP;

use crate::icon::{IconTheme, IconVariant};
use crate::menu::{MenuAction, MenuTree};

/// Sequence number of a refresh cycle. Later cycles have larger ticks.
pub type Tick = u64;

/// Receiver of presentation updates.
pub trait PresentationSink: Send {
    fn set_icon(&mut self, tick: Tick, theme: IconTheme);
    fn set_tooltip(&mut self, tick: Tick, text: String);
    fn set_menu(&mut self, tick: Tick, menu: MenuTree);
    fn set_visible(&mut self, tick: Tick, visible: bool);
}

/// Events emitted by the tray to the agent core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayEvent {
    /// User activated a menu item.
    MenuSelected(MenuAction),
    /// User left-clicked the icon.
    LeftClick,
    /// Desktop theme or scale changed; the tray wants a fresh cycle.
    RefreshRequested,
}

/// Updates sent from the agent core to the tray.
#[derive(Debug, Clone, PartialEq)]
pub enum TrayUpdate {
    Icon { tick: Tick, theme: IconTheme },
    Tooltip { tick: Tick, text: String },
    Menu { tick: Tick, menu: MenuTree },
    Visible { tick: Tick, visible: bool },
    /// Request tray shutdown.
    Shutdown,
}

impl TrayUpdate {
    fn tick(&self) -> Option<Tick> {
        match self {
            Self::Icon { tick, .. }
            | Self::Tooltip { tick, .. }
            | Self::Menu { tick, .. }
            | Self::Visible { tick, .. } => Some(*tick),
            Self::Shutdown => None,
        }
    }
}

/// Sending half of the update channel. Cheap to clone.
#[derive(Debug, Clone)]
pub struct TraySink {
    update_tx: mpsc::Sender<TrayUpdate>,
}

impl TraySink {
    fn send(&self, update: TrayUpdate) {
        if self.update_tx.send(update).is_err() {
            tracing::debug!("tray update dropped: tray is gone");
        }
    }
}

impl PresentationSink for TraySink {
    fn set_icon(&mut self, tick: Tick, theme: IconTheme) {
        self.send(TrayUpdate::Icon { tick, theme });
    }

    fn set_tooltip(&mut self, tick: Tick, text: String) {
        self.send(TrayUpdate::Tooltip { tick, text });
    }

    fn set_menu(&mut self, tick: Tick, menu: MenuTree) {
        self.send(TrayUpdate::Menu { tick, menu });
    }

    fn set_visible(&mut self, tick: Tick, visible: bool) {
        self.send(TrayUpdate::Visible { tick, visible });
    }
}

/// Handle for communicating with the system tray from the agent core.
///
/// The tray event loop runs on the main thread and communicates via
/// channels.
pub struct TrayHandle {
    /// Send updates to the tray.
    sink: TraySink,
    /// Receive events from the tray.
    event_rx: mpsc::Receiver<TrayEvent>,
}

impl TrayHandle {
    /// Creates a new tray handle with its channel pair.
    ///
    /// Returns `(handle, event_sender, update_receiver)`. The sender/receiver
    /// pair is given to the tray event loop running on the main thread.
    pub fn new() -> (Self, mpsc::Sender<TrayEvent>, mpsc::Receiver<TrayUpdate>) {
        let (update_tx, update_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let handle = Self {
            sink: TraySink { update_tx },
            event_rx,
        };

        (handle, event_tx, update_rx)
    }

    /// Returns a sink feeding this tray.
    pub fn sink(&self) -> TraySink {
        self.sink.clone()
    }

    /// Requests the tray to shut down.
    pub fn shutdown(&self) {
        self.sink.send(TrayUpdate::Shutdown);
    }

    /// Tries to receive a tray event (non-blocking).
    pub fn try_recv_event(&self) -> Option<TrayEvent> {
        self.event_rx.try_recv().ok()
    }
}

/// What the tray currently shows. Owned by the tray thread.
#[derive(Debug, Clone, PartialEq)]
pub struct TrayModel {
    pub theme: IconTheme,
    pub tooltip: String,
    pub menu: MenuTree,
    pub visible: bool,
    /// Display scale factor of the surface the icon is drawn on.
    scale_factor: f64,
    newest_tick: Option<Tick>,
}

impl Default for TrayModel {
    fn default() -> Self {
        Self {
            theme: IconTheme::default(),
            tooltip: LOADING_TOOLTIP.into(),
            menu: MenuTree::loading(),
            visible: true,
            scale_factor: 1.0,
            newest_tick: None,
        }
    }
}

impl TrayModel {
    /// Creates a model for a surface with the given display scale factor.
    pub fn with_scale_factor(scale_factor: f64) -> Self {
        Self {
            scale_factor,
            ..Self::default()
        }
    }

    /// Records a display scale change, e.g. after moving to another monitor.
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    /// Image to draw for the current theme and scale factor.
    pub fn icon(&self) -> IconVariant {
        IconVariant::select(self.theme, self.scale_factor)
    }

    /// Applies an update unless a newer tick has already been applied.
    ///
    /// Returns `false` for stale updates and for [`TrayUpdate::Shutdown`].
    pub fn apply(&mut self, update: TrayUpdate) -> bool {
        let Some(tick) = update.tick() else {
            return false;
        };
        if self.newest_tick.is_some_and(|newest| tick < newest) {
            tracing::debug!(tick, "stale tray update ignored");
            return false;
        }
        self.newest_tick = Some(tick);

        match update {
            TrayUpdate::Icon { theme, .. } => self.theme = theme,
            TrayUpdate::Tooltip { text, .. } => self.tooltip = text,
            TrayUpdate::Menu { menu, .. } => self.menu = menu,
            TrayUpdate::Visible { visible, .. } => self.visible = visible,
            TrayUpdate::Shutdown => return false,
        }
        true
    }

    /// Tick of the newest applied update.
    pub fn newest_tick(&self) -> Option<Tick> {
        self.newest_tick
    }
}
