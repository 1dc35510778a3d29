use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TtsError {
    #[error("Text must not be empty")]
    EmptyInput,

    #[error("Invalid speech rate {0}%: must be between {min} and {max}", min = crate::types::SpeechRate::MIN, max = crate::types::SpeechRate::MAX)]
    InvalidRate(u16),

    #[error("Invalid pause {0}ms: must be at most {max}ms", max = crate::types::PauseDuration::MAX_MS)]
    InvalidPause(u64),

    #[error("Unknown voice '{name}'. Available: {available}")]
    UnknownVoice { name: String, available: String },

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Audio stitching failed: {0}")]
    StitchFailed(String),

    #[error("{operation} timed out after {}s", .after.as_secs_f32())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("Merged batch aborted at item {}: {source}", .index + 1)]
    BatchMergeAborted {
        index: usize,
        #[source]
        source: Box<TtsError>,
    },

    #[error("Invalid batch input: {0}")]
    InvalidBatchInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TtsError {
    /// Stable tag for structured error payloads
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::InvalidRate(_) => "invalid_rate",
            Self::InvalidPause(_) => "invalid_pause",
            Self::UnknownVoice { .. } => "unknown_voice",
            Self::ProviderError(_) => "provider_error",
            Self::StitchFailed(_) => "stitch_failed",
            Self::Timeout { .. } => "timeout",
            Self::BatchMergeAborted { .. } => "batch_merge_aborted",
            Self::InvalidBatchInput(_) => "invalid_batch_input",
            Self::Io(_) => "io",
        }
    }

    /// Errors raised before any network or subprocess call
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput
                | Self::InvalidRate(_)
                | Self::InvalidPause(_)
                | Self::UnknownVoice { .. }
                | Self::InvalidBatchInput(_)
        )
    }
}

impl From<serde_json::Error> for TtsError {
    fn from(source: serde_json::Error) -> Self {
        Self::InvalidBatchInput(source.to_string())
    }
}

pub type Result<T, E = TtsError> = std::result::Result<T, E>;
