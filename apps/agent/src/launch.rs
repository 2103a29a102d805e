//! Starting the game, opening links, and quitting.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use tokio_util::sync::CancellationToken;

use crate::config::{Config, Ferium};

/// Server the game connects to when launched through portablemc.
const GAME_SERVER: &str = "wurstmineberg.de";

#[cfg(target_os = "windows")]
const VENDOR_LAUNCHER_EXE: &str = r"C:\Program Files (x86)\Minecraft Launcher\MinecraftLauncher.exe";

#[cfg(target_os = "windows")]
const VENDOR_LAUNCHER_APP: &str =
    r"shell:AppsFolder\Microsoft.4297127D64EC6_8wekyb3d8bbwe!Minecraft";

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{command} exited with {status}")]
    Failed { command: String, status: ExitStatus },

    #[error("failed to parse `ferium profile` output")]
    FeriumProfileFormat,

    #[error("failed to open {url}: {source}")]
    Open {
        url: String,
        #[source]
        source: io::Error,
    },
}

/// Carries out the side effects requested from the tray menu.
pub trait ProcessLauncher: Send + Sync {
    /// Starts the game. `version` is the main world's reported version.
    fn launch_game(&self, config: &Config, version: Option<&str>) -> Result<(), LaunchError>;

    fn open_url(&self, url: &str) -> Result<(), LaunchError>;

    /// Requests a clean application shutdown.
    fn exit_application(&self);
}

/// A program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl LaunchCommand {
    fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).stdin(Stdio::null());

        #[cfg(target_os = "windows")]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            cmd.creation_flags(CREATE_NO_WINDOW);
        }

        cmd
    }

    /// Starts the program without waiting for it.
    fn spawn(&self) -> io::Result<()> {
        self.command()
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(drop)
    }

    /// Runs the program to completion and returns its stdout.
    fn run(&self) -> Result<String, LaunchError> {
        let output = self
            .command()
            .stderr(Stdio::null())
            .output()
            .map_err(|source| LaunchError::Spawn {
                command: self.display(),
                source,
            })?;
        if !output.status.success() {
            return Err(LaunchError::Failed {
                command: self.display(),
                status: output.status,
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Version to launch: the ferium override if set, else the reported one.
pub fn game_version<'a>(config: &'a Config, reported: Option<&'a str>) -> Option<&'a str> {
    config.ferium.version_override.as_deref().or(reported)
}

fn ferium_command(ferium: &Ferium, args: &[&str]) -> LaunchCommand {
    let mut full = Vec::with_capacity(args.len() + 2);
    if let Some(token) = &ferium.github_token {
        full.extend(["--github-token", token.as_str()]);
    }
    full.extend_from_slice(args);
    LaunchCommand::new("ferium", &full)
}

/// Name of the active profile in `ferium profile` output.
fn parse_active_profile(output: &str) -> Option<&str> {
    let end = output.find(" *")?;
    Some(output[..end].trim())
}

/// Game directory of the active profile: the parent of its mods directory.
fn parse_game_dir(output: &str) -> Option<PathBuf> {
    output.lines().find_map(|line| {
        let (_, dir) = line.split_once("Output directory:")?;
        let mut dir = PathBuf::from(dir.trim());
        dir.pop();
        Some(dir)
    })
}

/// Upgrades the mods of `profile` for `version`, restoring the previously
/// active ferium profile afterwards.
///
/// `run` executes one command and returns its stdout. Returns the profile's
/// game directory if ferium reports one.
pub fn prepare_ferium_profile(
    ferium: &Ferium,
    profile: &str,
    version: &str,
    mut run: impl FnMut(&LaunchCommand) -> Result<String, LaunchError>,
) -> Result<Option<PathBuf>, LaunchError> {
    let listing = run(&ferium_command(ferium, &["profile"]))?;
    let previous = parse_active_profile(&listing)
        .ok_or(LaunchError::FeriumProfileFormat)?
        .to_string();

    run(&ferium_command(ferium, &["profile", "switch", profile]))?;
    let current = run(&ferium_command(ferium, &["profile"]))?;
    run(&ferium_command(
        ferium,
        &["profile", "configure", "--game-version", version],
    ))?;
    run(&ferium_command(ferium, &["upgrade"]))?;
    run(&ferium_command(ferium, &["profile", "switch", previous.as_str()]))?;

    Ok(parse_game_dir(&current))
}

/// Candidate commands for starting the game, most preferred first.
///
/// With a portablemc login only portablemc is tried. Otherwise Prism
/// Launcher comes first, then the vendor launcher.
pub fn launch_candidates(
    config: &Config,
    version: Option<&str>,
    work_dir: Option<&Path>,
) -> Vec<LaunchCommand> {
    if let Some(login) = &config.portablemc.login {
        let target = format!("fabric:{}", version.unwrap_or_default());
        let server = format!("--server={GAME_SERVER}");
        let work_dir = work_dir.map(|dir| dir.display().to_string());

        let mut args = vec!["-m", "portablemc"];
        if let Some(dir) = &work_dir {
            args.extend(["--work-dir", dir.as_str()]);
        }
        args.extend(["start", target.as_str(), server.as_str(), "--login", login.as_str()]);
        return vec![LaunchCommand::new("python", &args)];
    }

    let prism = match &config.prism_instance {
        Some(instance) => LaunchCommand::new("prismlauncher", &["--show", instance]),
        None => LaunchCommand::new("prismlauncher", &[]),
    };

    let mut candidates = vec![prism];
    candidates.extend(vendor_launcher());
    candidates
}

#[cfg(target_os = "windows")]
fn vendor_launcher() -> Vec<LaunchCommand> {
    vec![
        LaunchCommand::new(VENDOR_LAUNCHER_EXE, &[]),
        LaunchCommand::new("explorer", &[VENDOR_LAUNCHER_APP]),
    ]
}

#[cfg(not(target_os = "windows"))]
fn vendor_launcher() -> Vec<LaunchCommand> {
    vec![LaunchCommand::new("minecraft-launcher", &[])]
}

/// Spawns the first candidate whose program exists.
fn spawn_first(candidates: &[LaunchCommand]) -> Result<(), LaunchError> {
    let mut last_missing = None;
    for candidate in candidates {
        match candidate.spawn() {
            Ok(()) => {
                tracing::info!(command = %candidate.display(), "game launcher started");
                return Ok(());
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(program = %candidate.program, "launcher not installed");
                last_missing = Some((candidate, e));
            }
            Err(e) => {
                return Err(LaunchError::Spawn {
                    command: candidate.display(),
                    source: e,
                });
            }
        }
    }

    Err(match last_missing {
        Some((candidate, source)) => LaunchError::Spawn {
            command: candidate.display(),
            source,
        },
        None => LaunchError::Spawn {
            command: String::new(),
            source: io::Error::new(io::ErrorKind::NotFound, "no launcher candidates"),
        },
    })
}

/// Launcher backed by real processes and the desktop browser.
pub struct DesktopLauncher {
    cancel: CancellationToken,
}

impl DesktopLauncher {
    /// `cancel` is fired on [`ProcessLauncher::exit_application`].
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }
}

impl ProcessLauncher for DesktopLauncher {
    fn launch_game(&self, config: &Config, version: Option<&str>) -> Result<(), LaunchError> {
        let version = game_version(config, version);

        let work_dir = match (config.ferium.profiles.get(&config.main_world), version) {
            (Some(profile), Some(version)) => {
                tracing::info!(profile = %profile, version, "upgrading ferium profile");
                prepare_ferium_profile(&config.ferium, profile, version, LaunchCommand::run)?
            }
            _ => None,
        };

        spawn_first(&launch_candidates(config, version, work_dir.as_deref()))
    }

    fn open_url(&self, url: &str) -> Result<(), LaunchError> {
        open::that(url).map_err(|source| LaunchError::Open {
            url: url.into(),
            source,
        })
    }

    fn exit_application(&self) {
        tracing::info!("exit requested via tray");
        self.cancel.cancel();
    }
}
