//! Deterministic provider and stitcher doubles. Shipped in the library so
//! the CLI, the MCP server and integration tests can all run offline.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::audio::stitcher::stitched_duration;
use crate::audio::{AudioArtifact, AudioFormat, AudioStitcher};
use crate::error::{Result, TtsError};
use crate::tts::{SpeechInput, SpeechProvider};
use crate::voice::{Engine, VoiceDescriptor};

pub const MOCK_SAMPLE_RATE: u32 = 16_000;

/// Bytes of PCM produced per character of SSML input
const BYTES_PER_CHAR: usize = 64;

/// Mock behavior for the mock provider
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MockBehavior {
    /// Return successful responses
    #[default]
    Success,
    /// Always fail with a provider error carrying this message
    AlwaysProviderError { message: String },
    /// Fail only when the SSML contains this text
    FailOnText { text: String },
    /// Never answer, to exercise timeouts
    Hang,
    /// Credential lookup fails, synthesis still works
    NoCredentials,
}

/// A small multi-language voice set, usable as a fixed catalog
pub fn default_voices() -> Vec<VoiceDescriptor> {
    let voice = |id: &str, code: &str, language: &str, gender: &str, engines: &[Engine]| {
        VoiceDescriptor {
            id: id.to_string(),
            name: id.to_string(),
            language_code: code.to_string(),
            language_name: language.to_string(),
            gender: gender.to_string(),
            engines: engines.to_vec(),
        }
    };

    vec![
        voice(
            "Joanna",
            "en-US",
            "US English",
            "Female",
            &[Engine::Standard, Engine::Neural, Engine::Generative],
        ),
        voice(
            "Matthew",
            "en-US",
            "US English",
            "Male",
            &[Engine::Standard, Engine::Neural, Engine::Generative],
        ),
        voice("Marlene", "de-DE", "German", "Female", &[Engine::Standard]),
        voice("Hans", "de-DE", "German", "Male", &[Engine::Standard]),
        voice("Vicki", "de-DE", "German", "Female", &[Engine::Standard, Engine::Neural]),
        voice("Daniel", "de-DE", "German", "Male", &[Engine::Neural]),
        voice("Tatyana", "ru-RU", "Russian", "Female", &[Engine::Standard]),
        voice("Maxim", "ru-RU", "Russian", "Male", &[Engine::Standard]),
        voice("Seoyeon", "ko-KR", "Korean", "Female", &[Engine::Standard, Engine::Neural]),
    ]
}

/// Provider whose audio is a pure function of its input
#[derive(Clone)]
pub struct MockSpeechProvider {
    behavior: MockBehavior,
    voices: Vec<VoiceDescriptor>,
    describe_calls: Arc<AtomicUsize>,
    inputs: Arc<Mutex<Vec<SpeechInput>>>,
}

impl MockSpeechProvider {
    pub fn new() -> Self {
        Self::with_behavior(MockBehavior::Success)
    }

    pub fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            voices: default_voices(),
            describe_calls: Arc::new(AtomicUsize::new(0)),
            inputs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn describe_calls(&self) -> usize {
        self.describe_calls.load(Ordering::SeqCst)
    }

    /// Every synthesis input received, in call order
    pub fn inputs(&self) -> Vec<SpeechInput> {
        self.inputs.lock().unwrap().clone()
    }

    pub fn synthesize_calls(&self) -> usize {
        self.inputs.lock().unwrap().len()
    }

    /// The PCM the mock returns for a given SSML string
    pub fn render(ssml: &str) -> Vec<u8> {
        let digest = Sha256::digest(ssml.as_bytes());
        let len = (ssml.chars().count() * BYTES_PER_CHAR).max(2);
        digest.iter().copied().cycle().take(len & !1).collect()
    }
}

impl Default for MockSpeechProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechProvider for MockSpeechProvider {
    async fn describe_voices(&self) -> Result<Vec<VoiceDescriptor>> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            MockBehavior::AlwaysProviderError { message } => {
                Err(TtsError::ProviderError(message.clone()))
            }
            MockBehavior::Hang => std::future::pending().await,
            _ => Ok(self.voices.clone()),
        }
    }

    async fn synthesize(&self, input: &SpeechInput) -> Result<AudioArtifact> {
        self.inputs.lock().unwrap().push(input.clone());

        match &self.behavior {
            MockBehavior::AlwaysProviderError { message } => {
                return Err(TtsError::ProviderError(message.clone()))
            }
            MockBehavior::FailOnText { text } if input.ssml.contains(text.as_str()) => {
                return Err(TtsError::ProviderError(format!(
                    "ThrottlingException: rate exceeded for '{text}'"
                )))
            }
            MockBehavior::Hang => std::future::pending::<()>().await,
            _ => {}
        }

        Ok(AudioArtifact::from_pcm16(
            Self::render(&input.ssml),
            MOCK_SAMPLE_RATE,
            1,
        ))
    }

    async fn check_credentials(&self) -> Result<String> {
        match &self.behavior {
            MockBehavior::NoCredentials => Err(TtsError::ProviderError(
                "no credentials in the mock chain".to_string(),
            )),
            MockBehavior::AlwaysProviderError { message } => {
                Err(TtsError::ProviderError(message.clone()))
            }
            _ => Ok("mock credentials".to_string()),
        }
    }
}

/// Stitcher that concatenates raw bytes, writing zero bytes for each gap.
/// Output keeps the byte order of the input so tests can check leg order.
#[derive(Clone, Default)]
pub struct MockStitcher {
    unavailable: bool,
    calls: Arc<AtomicUsize>,
}

impl MockStitcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stitcher that behaves like a missing binary
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn missing() -> TtsError {
        TtsError::StitchFailed("ffmpeg not found".to_string())
    }
}

#[async_trait]
impl AudioStitcher for MockStitcher {
    async fn concatenate(&self, clips: &[AudioArtifact], gap: Duration) -> Result<AudioArtifact> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(Self::missing());
        }
        let Some(first) = clips.first() else {
            return Err(TtsError::StitchFailed("no clips to concatenate".to_string()));
        };

        let rate = first.format.sample_rate;
        let channels = first.format.channels;
        let gap_bytes = (gap.as_millis() as usize * rate as usize / 1000) * 2 * channels as usize;

        let mut data = Vec::new();
        for (i, clip) in clips.iter().enumerate() {
            if i > 0 {
                data.resize(data.len() + gap_bytes, 0);
            }
            data.extend_from_slice(&clip.data);
        }

        Ok(AudioArtifact {
            data,
            duration: stitched_duration(clips, gap),
            format: AudioFormat::mp3(rate, channels),
        })
    }

    async fn version(&self) -> Result<String> {
        if self.unavailable {
            return Err(Self::missing());
        }
        Ok("mock stitcher 1.0".to_string())
    }
}
