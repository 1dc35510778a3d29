use async_trait::async_trait;

use crate::audio::AudioArtifact;
use crate::error::Result;
use crate::voice::{Engine, VoiceDescriptor};

/// One fully-resolved synthesis call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechInput {
    pub ssml: String,
    pub voice_id: String,
    pub engine: Engine,
    pub language_code: String,
}

/// Trait for text-to-speech providers
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// List every voice available to the configured account and region
    async fn describe_voices(&self) -> Result<Vec<VoiceDescriptor>>;

    /// Synthesize SSML to audio
    async fn synthesize(&self, input: &SpeechInput) -> Result<AudioArtifact>;

    /// Confirm credentials are available, returning a description of their source
    async fn check_credentials(&self) -> Result<String>;
}
