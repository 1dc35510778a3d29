//! AWS Polly text-to-speech implementation

use std::time::Duration;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_polly::config::Region;
use aws_sdk_polly::error::DisplayErrorContext;
use aws_sdk_polly::types::{Engine as PollyEngine, LanguageCode, OutputFormat, TextType, VoiceId};
use aws_sdk_polly::Client;
use tracing::{debug, info, warn};

use super::provider::{SpeechInput, SpeechProvider};
use crate::audio::AudioArtifact;
use crate::error::{Result, TtsError};
use crate::voice::{Engine, VoiceDescriptor};

/// Polly only serves PCM at 8 or 16 kHz
const PCM_SAMPLE_RATE: u32 = 16_000;

/// Configuration for AWS Polly
#[derive(Debug, Clone)]
pub struct AwsPollyConfig {
    pub profile: Option<String>,
    pub region: String,
    /// Deadline for catalog and credential calls
    pub timeout: Duration,
}

impl Default for AwsPollyConfig {
    fn default() -> Self {
        Self {
            profile: None,
            region: "us-east-1".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// AWS Polly text-to-speech provider
pub struct AwsPolly {
    client: Client,
    sdk_config: SdkConfig,
    timeout: Duration,
}

impl AwsPolly {
    /// Create a new AWS Polly client
    pub async fn new(config: AwsPollyConfig) -> Self {
        let mut aws_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(profile) = &config.profile {
            aws_config_loader = aws_config_loader.profile_name(profile);
        }

        aws_config_loader = aws_config_loader.region(Region::new(config.region));

        let sdk_config = aws_config_loader.load().await;
        let client = Client::new(&sdk_config);

        Self {
            client,
            sdk_config,
            timeout: config.timeout,
        }
    }

    async fn with_timeout<T>(
        &self,
        operation: &'static str,
        fut: impl std::future::Future<Output = Result<T>>,
    ) -> Result<T> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| TtsError::Timeout {
                operation,
                after: self.timeout,
            })?
    }

    fn to_polly_engine(engine: Engine) -> PollyEngine {
        match engine {
            Engine::Standard => PollyEngine::Standard,
            Engine::Neural => PollyEngine::Neural,
            Engine::LongForm => PollyEngine::LongForm,
            Engine::Generative => PollyEngine::Generative,
        }
    }

    fn from_polly_engine(engine: &PollyEngine) -> Option<Engine> {
        match engine {
            PollyEngine::Standard => Some(Engine::Standard),
            PollyEngine::Neural => Some(Engine::Neural),
            PollyEngine::LongForm => Some(Engine::LongForm),
            PollyEngine::Generative => Some(Engine::Generative),
            _ => None,
        }
    }

    async fn fetch_voices(&self) -> Result<Vec<VoiceDescriptor>> {
        let mut voices = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let response = self
                .client
                .describe_voices()
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| {
                    warn!(?e, "Polly DescribeVoices failed");
                    TtsError::ProviderError(DisplayErrorContext(&e).to_string())
                })?;

            voices.extend(response.voices.unwrap_or_default().into_iter().filter_map(|v| {
                let id = v.id?.as_str().to_string();
                let name = v.name.unwrap_or_else(|| id.clone());
                let language_code = v.language_code?.as_str().to_string();
                let engines = v
                    .supported_engines
                    .unwrap_or_default()
                    .iter()
                    .filter_map(Self::from_polly_engine)
                    .collect();
                Some(VoiceDescriptor {
                    id,
                    name,
                    language_code,
                    language_name: v.language_name.unwrap_or_default(),
                    gender: v.gender.map(|g| g.as_str().to_string()).unwrap_or_default(),
                    engines,
                })
            }));

            match response.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => break,
            }
        }

        Ok(voices)
    }
}

#[async_trait]
impl SpeechProvider for AwsPolly {
    async fn describe_voices(&self) -> Result<Vec<VoiceDescriptor>> {
        let voices = self
            .with_timeout("Polly DescribeVoices", self.fetch_voices())
            .await?;
        info!(count = voices.len(), "Fetched Polly voices");
        Ok(voices)
    }

    async fn synthesize(&self, input: &SpeechInput) -> Result<AudioArtifact> {
        debug!(voice = %input.voice_id, engine = %input.engine, "Polly SynthesizeSpeech");

        let response = self
            .client
            .synthesize_speech()
            .text(&input.ssml)
            .text_type(TextType::Ssml)
            .voice_id(VoiceId::from(input.voice_id.as_str()))
            .language_code(LanguageCode::from(input.language_code.as_str()))
            .engine(Self::to_polly_engine(input.engine))
            .output_format(OutputFormat::Pcm)
            .sample_rate(PCM_SAMPLE_RATE.to_string())
            .send()
            .await
            .map_err(|e| {
                warn!(?e, "Polly SynthesizeSpeech failed");
                TtsError::ProviderError(DisplayErrorContext(&e).to_string())
            })?;

        let bytes = response
            .audio_stream
            .collect()
            .await
            .map_err(|e| TtsError::ProviderError(format!("Failed to read audio stream: {e}")))?
            .into_bytes()
            .to_vec();

        Ok(AudioArtifact::from_pcm16(bytes, PCM_SAMPLE_RATE, 1))
    }

    async fn check_credentials(&self) -> Result<String> {
        let provider = self.sdk_config.credentials_provider().ok_or_else(|| {
            TtsError::ProviderError("no AWS credentials provider configured".to_string())
        })?;

        let credentials = self
            .with_timeout("AWS credential lookup", async {
                provider
                    .provide_credentials()
                    .await
                    .map_err(|e| TtsError::ProviderError(DisplayErrorContext(&e).to_string()))
            })
            .await?;

        let key = credentials.access_key_id();
        let visible = &key[key.len().saturating_sub(4)..];
        Ok(format!("access key ...{visible}"))
    }
}
