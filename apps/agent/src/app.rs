//! Application orchestrator: wires the scheduler, tray, and launcher together.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use worldtray_api::Client;
use worldtray_protocol::constants::REFRESH_INTERVAL;
use worldtray_tray::{MenuAction, TrayEvent, TrayHandle, TrayModel, TrayUpdate};

use crate::config::Config;
use crate::launch::{DesktopLauncher, ProcessLauncher};
use crate::scheduler::{Scheduler, Snapshot};

/// Scale factor of the headless tray surface.
const TRAY_SCALE_FACTOR: f64 = 1.0;

/// Runs the agent until shutdown is requested.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();

    // -- API client --
    // The scheduler passes the configured base URL on every fetch.
    let client = Client::new()?.with_base_url(config.base_url.clone());
    tracing::info!(base_url = %client.base_url(), "API client ready");

    // -- Tray --
    let (tray_handle, _event_tx, update_rx) = TrayHandle::new();
    let tray_thread = std::thread::Builder::new()
        .name("tray".into())
        .spawn(move || run_tray(update_rx, TRAY_SCALE_FACTOR))?;

    // -- Scheduler --
    let scheduler = Scheduler::new(
        client,
        tray_handle.sink(),
        config.clone(),
        Arc::new(Config::load),
    );
    let snapshot = scheduler.subscribe();
    let (refresh_tx, refresh_rx) = mpsc::unbounded_channel();
    let scheduler_task = tokio::spawn(scheduler.run(REFRESH_INTERVAL, refresh_rx, cancel.clone()));

    let launcher = DesktopLauncher::new(cancel.clone());

    tracing::info!("agent ready");

    // -- Main loop: wait for shutdown --
    tokio::select! {
        _ = cancel.cancelled() => {
            tracing::info!("shutdown signal received");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("SIGINT received, shutting down");
        }
        _ = poll_tray_events(&tray_handle, &launcher, &snapshot, &refresh_tx) => {}
    }

    // -- Graceful shutdown --
    tracing::info!("stopping services...");
    cancel.cancel();
    if let Err(e) = scheduler_task.await {
        tracing::error!("scheduler task failed: {e}");
    }
    tray_handle.shutdown();
    if tray_thread.join().is_err() {
        tracing::error!("tray thread panicked");
    }

    Ok(())
}

/// Dispatches tray events as they arrive. Never returns.
async fn poll_tray_events(
    tray_handle: &TrayHandle,
    launcher: &dyn ProcessLauncher,
    snapshot: &watch::Receiver<Snapshot>,
    refresh_tx: &mpsc::UnboundedSender<()>,
) {
    loop {
        while let Some(event) = tray_handle.try_recv_event() {
            // Launching may wait on ferium upgrades.
            tokio::task::block_in_place(|| handle_event(event, launcher, snapshot, refresh_tx));
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

/// Tray thread body: keeps the displayed model current until shutdown.
fn run_tray(update_rx: Receiver<TrayUpdate>, scale_factor: f64) {
    let mut model = TrayModel::with_scale_factor(scale_factor);
    tracing::debug!(
        tooltip = %model.tooltip,
        icon = model.icon().resource_name(),
        "tray showing loading state"
    );

    while let Ok(update) = update_rx.recv() {
        if matches!(update, TrayUpdate::Shutdown) {
            break;
        }
        if model.apply(update) {
            tracing::trace!(
                tick = ?model.newest_tick(),
                visible = model.visible,
                icon = model.icon().resource_name(),
                tooltip = %model.tooltip,
                menu = ?model.menu.labels(),
                "tray updated"
            );
        }
    }

    tracing::debug!("tray stopped");
}

/// Carries out one user interaction.
fn handle_event(
    event: TrayEvent,
    launcher: &dyn ProcessLauncher,
    snapshot: &watch::Receiver<Snapshot>,
    refresh_tx: &mpsc::UnboundedSender<()>,
) {
    let snapshot = snapshot.borrow().clone();

    let result = match event {
        TrayEvent::MenuSelected(MenuAction::OpenUrl(url)) => launcher.open_url(&url),
        TrayEvent::MenuSelected(MenuAction::LaunchGame) => {
            launcher.launch_game(&snapshot.config, snapshot.main_world_version())
        }
        TrayEvent::MenuSelected(MenuAction::Exit) => {
            launcher.exit_application();
            Ok(())
        }
        TrayEvent::LeftClick if snapshot.config.left_click_launch => {
            launcher.launch_game(&snapshot.config, snapshot.main_world_version())
        }
        TrayEvent::LeftClick => Ok(()),
        TrayEvent::RefreshRequested => {
            if refresh_tx.send(()).is_err() {
                tracing::debug!("refresh request dropped: scheduler stopped");
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!("tray action failed: {e}");
    }
}
