//! Refresh scheduler.
//!
//! Runs one refresh cycle per interval tick or manual request: reload the
//! configuration, fetch roster and statuses, sync launcher profiles,
//! aggregate, and push the result to the tray. Cycles run one after another
//! in a single task, so two of them never overlap.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use worldtray_api::{Client, WorldSource};
use worldtray_launcher::LauncherError;
use worldtray_presence::{PresentationState, aggregate, remove_ignored, tooltip};
use worldtray_protocol::{Roster, WorldStatusSet};
use worldtray_tray::{IconTheme, MenuTree, PresentationSink, Tick, synthesize};

use crate::config::Config;

/// Boxed future returned by [`StateSource::fetch_state`].
pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<(Roster, WorldStatusSet), worldtray_api::Error>> + Send + 'a>>;

/// Callback that reloads the configuration at the top of every cycle.
///
/// Runs on the blocking thread pool.
pub type ConfigFn = Arc<dyn Fn() -> anyhow::Result<Config> + Send + Sync + 'static>;

/// Anything that can produce a roster and world statuses.
pub trait StateSource: Send + Sync {
    /// Fetches from the API rooted at `base_url`, which may change between
    /// calls when the configuration is reloaded.
    fn fetch_state<'a>(&'a self, base_url: &'a str, worlds: &'a WorldSource) -> FetchFuture<'a>;
}

impl StateSource for Client {
    fn fetch_state<'a>(&'a self, base_url: &'a str, worlds: &'a WorldSource) -> FetchFuture<'a> {
        Box::pin(async move {
            if base_url == self.base_url() {
                Client::fetch_state(self, worlds).await
            } else {
                // Clones share the connection pool.
                let client = self.clone().with_base_url(base_url);
                client.fetch_state(worlds).await
            }
        })
    }
}

/// Latest configuration and presentation state, for event handlers.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub config: Config,
    /// `None` until the first successful cycle.
    pub state: Option<PresentationState>,
}

impl Snapshot {
    /// Version reported by the configured main world.
    pub fn main_world_version(&self) -> Option<&str> {
        self.state
            .as_ref()?
            .world(&self.config.main_world)?
            .version
            .as_deref()
    }
}

/// Drives refresh cycles and owns the success/error transition.
pub struct Scheduler<S, K> {
    source: S,
    sink: K,
    load_config: ConfigFn,
    config: Config,
    tick: Tick,
    failing: bool,
    snapshot_tx: watch::Sender<Snapshot>,
}

impl<S: StateSource, K: PresentationSink> Scheduler<S, K> {
    /// Creates a scheduler starting from `config`.
    pub fn new(source: S, sink: K, config: Config, load_config: ConfigFn) -> Self {
        let (snapshot_tx, _) = watch::channel(Snapshot {
            config: config.clone(),
            state: None,
        });
        Self {
            source,
            sink,
            load_config,
            config,
            tick: 0,
            failing: false,
            snapshot_tx,
        }
    }

    /// Subscribes to the snapshot published after every successful cycle.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Runs cycles until `cancel` fires.
    ///
    /// The first cycle starts immediately. A message on `requests` starts an
    /// extra cycle; requests arriving during a cycle are handled after it.
    pub async fn run(
        mut self,
        interval: Duration,
        mut requests: mpsc::UnboundedReceiver<()>,
        cancel: CancellationToken,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        tracing::info!(interval_sec = interval.as_secs(), "refresh scheduler started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
                Some(()) = requests.recv() => {
                    tracing::debug!("manual refresh requested");
                }
            }
            if let Err(e) = self.refresh().await {
                tracing::debug!(tick = self.tick, error = %e, "refresh cycle failed");
            }
        }

        tracing::info!("refresh scheduler stopped");
    }

    /// Runs a single refresh cycle and presents its result.
    pub async fn refresh(&mut self) -> Result<PresentationState, worldtray_api::Error> {
        self.tick += 1;
        let tick = self.tick;
        self.reload_config().await;

        let (roster, mut statuses) = match self
            .source
            .fetch_state(&self.config.base_url, &self.config.worlds)
            .await
        {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::warn!(tick, error = %e, "error getting data");
                self.failing = true;
                self.sink.set_menu(tick, MenuTree::from_error(&e));
                return Err(e);
            }
        };

        if self.failing {
            tracing::info!(tick, "data available again");
            self.failing = false;
        }

        remove_ignored(&mut statuses, &self.config.ignored_players);
        self.sync_launcher_profiles(&statuses).await;

        let state = aggregate(&roster, &statuses);
        let visible = self.config.visibility_policy().is_visible(&state);

        self.sink.set_icon(tick, IconTheme::detect());
        self.sink.set_tooltip(tick, tooltip(&state));
        self.sink.set_menu(tick, synthesize(&state));
        self.sink.set_visible(tick, visible);

        tracing::debug!(
            tick,
            online = state.total_online,
            worlds = state.worlds.len(),
            visible,
            "presence updated"
        );

        self.snapshot_tx.send_replace(Snapshot {
            config: self.config.clone(),
            state: Some(state.clone()),
        });
        Ok(state)
    }

    async fn reload_config(&mut self) {
        let load = Arc::clone(&self.load_config);
        match tokio::task::spawn_blocking(move || load()).await {
            Ok(Ok(config)) => {
                if config.base_url != self.config.base_url {
                    tracing::info!(base_url = %config.base_url, "API base URL changed");
                }
                self.config = config;
            }
            Ok(Err(e)) => tracing::warn!(error = %e, "failed to reload configuration, keeping previous"),
            Err(e) => tracing::error!("configuration reload task failed: {e}"),
        }
    }

    async fn sync_launcher_profiles(&self, statuses: &WorldStatusSet) {
        let rules = self.config.version_rules();
        if rules.is_empty() {
            return;
        }

        let paths = match self.config.profile_store_paths() {
            Ok(paths) => paths,
            Err(e) => {
                tracing::warn!(error = %e, "launcher profile sync skipped");
                return;
            }
        };
        let statuses = statuses.clone();

        let result = tokio::task::spawn_blocking(move || -> Result<_, LauncherError> {
            let path = paths.resolve()?;
            worldtray_launcher::sync(&rules, &statuses, &path).map(|report| (path, report))
        })
        .await;

        let result = match result {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("launcher profile sync task failed: {e}");
                return;
            }
        };

        match result {
            Ok((path, report)) => {
                for err in &report.errors {
                    tracing::warn!(error = %err, "version match rule skipped");
                }
                if report.written {
                    tracing::info!(
                        path = %path.display(),
                        profiles = ?report.updated,
                        "launcher profiles updated"
                    );
                }
            }
            Err(e) => tracing::warn!(error = %e, "launcher profile sync skipped"),
        }
    }
}
