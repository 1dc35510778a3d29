use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TtsError};

/// Speech rate as a percentage of the voice's natural speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct SpeechRate(u16);

impl SpeechRate {
    pub const MIN: u16 = 20;
    pub const MAX: u16 = 200;
    pub const DEFAULT: u16 = 90;

    pub fn new(percent: u16) -> Result<Self> {
        if !(Self::MIN..=Self::MAX).contains(&percent) {
            return Err(TtsError::InvalidRate(percent));
        }
        Ok(Self(percent))
    }

    pub fn percent(self) -> u16 {
        self.0
    }
}

impl Default for SpeechRate {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u16> for SpeechRate {
    type Error = TtsError;

    fn try_from(value: u16) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SpeechRate> for u16 {
    fn from(rate: SpeechRate) -> Self {
        rate.0
    }
}

/// Silence inserted between stitched segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct PauseDuration(u64);

impl PauseDuration {
    pub const MAX_MS: u64 = 10_000;
    pub const DEFAULT_MS: u64 = 500;

    pub fn from_millis(ms: u64) -> Result<Self> {
        if ms > Self::MAX_MS {
            return Err(TtsError::InvalidPause(ms));
        }
        Ok(Self(ms))
    }

    pub fn as_millis(self) -> u64 {
        self.0
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for PauseDuration {
    fn default() -> Self {
        Self(Self::DEFAULT_MS)
    }
}

impl TryFrom<u64> for PauseDuration {
    type Error = TtsError;

    fn try_from(value: u64) -> Result<Self> {
        Self::from_millis(value)
    }
}

impl From<PauseDuration> for u64 {
    fn from(pause: PauseDuration) -> Self {
        pause.0
    }
}

/// A request to synthesize a single text. The voice is a name and is only
/// resolved against the catalog when the request is synthesized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: String,
    pub rate: SpeechRate,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>, voice: impl Into<String>, rate: SpeechRate) -> Self {
        Self {
            text: text.into(),
            voice: voice.into(),
            rate,
        }
    }
}

/// Two legs played in order with a gap between them: the first leg is
/// always emitted before the pause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairRequest {
    pub first: SynthesisRequest,
    pub second: SynthesisRequest,
    pub pause: PauseDuration,
}

impl PairRequest {
    pub fn label(&self) -> String {
        format!("{} | {}", self.first.text, self.second.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchItem {
    Single(SynthesisRequest),
    Pair(PairRequest),
}

impl BatchItem {
    pub fn text(&self) -> String {
        match self {
            Self::Single(request) => request.text.clone(),
            Self::Pair(pair) => pair.label(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// One output file per input item
    #[default]
    OneFilePerInput,
    /// All items concatenated into a single file
    OneFilePerBatch,
}

impl MergeStrategy {
    pub fn from_flag(merge: bool) -> Self {
        if merge {
            Self::OneFilePerBatch
        } else {
            Self::OneFilePerInput
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub items: Vec<BatchItem>,
    pub merge: MergeStrategy,
    /// Gap between items in merged output
    pub pause: PauseDuration,
}

/// A file written by one of the synthesis operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisResult {
    pub file_path: PathBuf,
    pub text: String,
    pub voice: String,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemFailure {
    /// Zero-based position in the batch input
    pub index: usize,
    pub text: String,
    pub kind: &'static str,
    pub error: String,
}

impl ItemFailure {
    pub fn new(index: usize, text: String, error: &TtsError) -> Self {
        Self {
            index,
            text,
            kind: error.kind(),
            error: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub results: Vec<SynthesisResult>,
    pub failures: Vec<ItemFailure>,
}

impl BatchReport {
    /// True when there was work to do and none of it succeeded
    pub fn is_total_failure(&self) -> bool {
        self.results.is_empty() && !self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_bounds() {
        assert!(matches!(SpeechRate::new(0), Err(TtsError::InvalidRate(0))));
        assert!(matches!(
            SpeechRate::new(250),
            Err(TtsError::InvalidRate(250))
        ));
        assert_eq!(SpeechRate::new(90).unwrap().percent(), 90);
        assert_eq!(SpeechRate::new(20).unwrap().percent(), 20);
        assert_eq!(SpeechRate::new(200).unwrap().percent(), 200);
        assert_eq!(SpeechRate::default().percent(), 90);
    }

    #[test]
    fn rate_deserialization_is_validated() {
        let ok: SpeechRate = serde_json::from_str("75").unwrap();
        assert_eq!(ok.percent(), 75);
        assert!(serde_json::from_str::<SpeechRate>("5").is_err());
    }

    #[test]
    fn pause_bounds() {
        assert_eq!(PauseDuration::default().as_millis(), 500);
        assert_eq!(
            PauseDuration::from_millis(0).unwrap().as_duration(),
            Duration::ZERO
        );
        assert!(matches!(
            PauseDuration::from_millis(60_000),
            Err(TtsError::InvalidPause(60_000))
        ));
    }

    #[test]
    fn total_failure_requires_failures() {
        assert!(!BatchReport::default().is_total_failure());

        let report = BatchReport {
            results: Vec::new(),
            failures: vec![ItemFailure::new(0, String::new(), &TtsError::EmptyInput)],
        };
        assert!(report.is_total_failure());
    }
}
