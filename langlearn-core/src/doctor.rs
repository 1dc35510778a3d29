//! Environment diagnostics. Every check is independent, runs once and never
//! changes anything.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::audio::playback::Player;
use crate::audio::AudioStitcher;
use crate::error::{Result, TtsError};
use crate::tts::SpeechProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Fail,
    Skip,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Skip => "SKIP",
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: &'static str,
    pub required: bool,
    pub status: CheckStatus,
    pub detail: String,
}

impl CheckResult {
    fn from_result(name: &'static str, required: bool, result: Result<String>) -> Self {
        let (status, detail) = match result {
            Ok(detail) => (CheckStatus::Pass, detail),
            Err(e) => (CheckStatus::Fail, e.to_string()),
        };
        Self {
            name,
            required,
            status,
            detail,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
    pub checks: Vec<CheckResult>,
}

impl DoctorReport {
    /// False when any required check failed
    pub fn is_healthy(&self) -> bool {
        !self
            .checks
            .iter()
            .any(|c| c.required && c.status == CheckStatus::Fail)
    }

    pub fn check(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.name == name)
    }
}

impl fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for check in &self.checks {
            let optional = if check.required { "" } else { " (optional)" };
            writeln!(
                f,
                "[{}] {}{}: {}",
                check.status, check.name, optional, check.detail
            )?;
        }
        Ok(())
    }
}

pub const CHECK_RUNTIME: &str = "runtime";
pub const CHECK_AUDIO_TOOL: &str = "audio tool";
pub const CHECK_CREDENTIALS: &str = "credentials";
pub const CHECK_PERMISSIONS: &str = "provider permissions";
pub const CHECK_OUTPUT_DIR: &str = "output directory";
pub const CHECK_PLAYBACK: &str = "playback";

pub struct Doctor<'a> {
    pub provider: &'a dyn SpeechProvider,
    pub stitcher: &'a dyn AudioStitcher,
    pub player: &'a Player,
    pub output_dir: PathBuf,
    pub timeout: Duration,
}

impl Doctor<'_> {
    pub async fn run(&self) -> DoctorReport {
        let (audio_tool, credentials, permissions) = tokio::join!(
            self.bounded("audio tool probe", self.stitcher.version()),
            self.bounded("credential lookup", self.provider.check_credentials()),
            self.bounded("permission probe", self.permissions()),
        );

        let playback = if self.player.is_available() {
            CheckResult {
                name: CHECK_PLAYBACK,
                required: false,
                status: CheckStatus::Pass,
                detail: self.player.program().display().to_string(),
            }
        } else {
            CheckResult {
                name: CHECK_PLAYBACK,
                required: false,
                status: CheckStatus::Skip,
                detail: format!(
                    "{} not found; auto-play is unavailable",
                    self.player.program().display()
                ),
            }
        };

        let report = DoctorReport {
            checks: vec![
                CheckResult::from_result(CHECK_RUNTIME, false, Ok(runtime())),
                CheckResult::from_result(CHECK_AUDIO_TOOL, true, audio_tool),
                CheckResult::from_result(CHECK_CREDENTIALS, true, credentials),
                CheckResult::from_result(CHECK_PERMISSIONS, true, permissions),
                CheckResult::from_result(CHECK_OUTPUT_DIR, true, writable(&self.output_dir)),
                playback,
            ],
        };
        info!(healthy = report.is_healthy(), "Doctor finished");
        report
    }

    async fn bounded(
        &self,
        operation: &'static str,
        fut: impl std::future::Future<Output = Result<String>>,
    ) -> Result<String> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| TtsError::Timeout {
                operation,
                after: self.timeout,
            })?
    }

    async fn permissions(&self) -> Result<String> {
        let voices = self.provider.describe_voices().await?;
        Ok(format!("DescribeVoices returned {} voices", voices.len()))
    }
}

fn runtime() -> String {
    format!(
        "langlearn-core {} on {}/{}",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

fn writable(dir: &Path) -> Result<String> {
    if !dir.is_dir() {
        return Err(TtsError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", dir.display()),
        )));
    }
    tempfile::NamedTempFile::new_in(dir)?;
    Ok(format!("{} is writable", dir.display()))
}
