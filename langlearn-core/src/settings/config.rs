use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{PauseDuration, SpeechRate};

fn default_region() -> String {
    "us-east-1".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PollySettings {
    /// Named AWS profile; the default credential chain is used when unset
    #[serde(default)]
    pub profile: Option<String>,

    #[serde(default = "default_region")]
    pub region: String,
}

impl Default for PollySettings {
    fn default() -> Self {
        Self {
            profile: None,
            region: default_region(),
        }
    }
}

/// Values used when a command or tool call leaves a parameter out
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DefaultsSettings {
    #[serde(default = "default_voice")]
    pub voice: String,

    /// First leg of a pair, typically the learner's native language
    #[serde(default = "default_voice")]
    pub voice1: String,

    /// Second leg of a pair, typically the language being learned
    #[serde(default = "default_voice2")]
    pub voice2: String,

    #[serde(default = "default_rate")]
    pub rate: u16,

    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,

    /// Output directory; the current directory when unset
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

fn default_voice() -> String {
    "joanna".to_string()
}

fn default_voice2() -> String {
    "hans".to_string()
}

fn default_rate() -> u16 {
    SpeechRate::DEFAULT
}

fn default_pause_ms() -> u64 {
    PauseDuration::DEFAULT_MS
}

impl Default for DefaultsSettings {
    fn default() -> Self {
        Self {
            voice: default_voice(),
            voice1: default_voice(),
            voice2: default_voice2(),
            rate: default_rate(),
            pause_ms: default_pause_ms(),
            output_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AudioSettings {
    /// ffmpeg binary; looked up on PATH when unset
    #[serde(default)]
    pub ffmpeg: Option<PathBuf>,

    /// Player used for auto-play; afplay on macOS and ffplay elsewhere when unset
    #[serde(default)]
    pub player: Option<PathBuf>,

    #[serde(default)]
    pub player_args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeoutSettings {
    #[serde(default = "default_synthesis_secs")]
    pub synthesis_secs: u64,

    #[serde(default = "default_stitch_secs")]
    pub stitch_secs: u64,

    /// Doctor checks and catalog fetches
    #[serde(default = "default_probe_secs")]
    pub probe_secs: u64,
}

fn default_synthesis_secs() -> u64 {
    30
}

fn default_stitch_secs() -> u64 {
    60
}

fn default_probe_secs() -> u64 {
    15
}

impl TimeoutSettings {
    pub fn synthesis(&self) -> Duration {
        Duration::from_secs(self.synthesis_secs)
    }

    pub fn stitch(&self) -> Duration {
        Duration::from_secs(self.stitch_secs)
    }

    pub fn probe(&self) -> Duration {
        Duration::from_secs(self.probe_secs)
    }
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            synthesis_secs: default_synthesis_secs(),
            stitch_secs: default_stitch_secs(),
            probe_secs: default_probe_secs(),
        }
    }
}

fn default_batch_concurrency() -> usize {
    1
}

/// Core application settings, stored as TOML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Batch items synthesized at once. Output order never depends on this.
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,

    #[serde(default)]
    pub polly: PollySettings,

    #[serde(default)]
    pub defaults: DefaultsSettings,

    #[serde(default)]
    pub audio: AudioSettings,

    #[serde(default)]
    pub timeouts: TimeoutSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            batch_concurrency: default_batch_concurrency(),
            polly: PollySettings::default(),
            defaults: DefaultsSettings::default(),
            audio: AudioSettings::default(),
            timeouts: TimeoutSettings::default(),
        }
    }
}
