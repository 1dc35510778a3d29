//! Fire-and-forget playback of written files through a local player binary

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Player {
    program: PathBuf,
    args: Vec<String>,
}

impl Player {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `afplay` on macOS, `ffplay` everywhere else
    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("afplay", Vec::new())
        } else {
            Self::new(
                "ffplay",
                ["-nodisp", "-autoexit", "-loglevel", "quiet"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            )
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Start playing `path` without waiting for it to finish. Failures are
    /// logged; playback never fails the caller.
    pub fn play(&self, path: &Path) {
        let spawned = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(mut child) => {
                info!(?path, player = ?self.program, "Started playback");
                tokio::spawn(async move {
                    if let Err(e) = child.wait().await {
                        warn!(?e, "Playback process failed");
                    }
                });
            }
            Err(e) => warn!(?e, player = ?self.program, "Failed to start playback"),
        }
    }

    /// Whether the player binary can be found on PATH (or at its explicit path)
    pub fn is_available(&self) -> bool {
        find_program(&self.program).is_some()
    }
}

pub(crate) fn find_program(program: &Path) -> Option<PathBuf> {
    if program.components().count() > 1 {
        return program.is_file().then(|| program.to_path_buf());
    }

    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}
