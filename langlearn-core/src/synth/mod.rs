pub mod batch;
pub mod input;
pub mod naming;

pub use batch::BatchRunner;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::audio::{AudioArtifact, AudioStitcher, Encoding};
use crate::error::{Result, TtsError};
use crate::tts::{ssml, SpeechInput, SpeechProvider};
use crate::types::{BatchItem, PairRequest, SynthesisRequest};
use crate::voice::VoiceCatalog;

/// A validated request, ready for the provider
struct Prepared {
    input: SpeechInput,
    voice: String,
}

/// Audio plus the display label of the voice(s) that produced it
#[derive(Debug, Clone)]
pub struct Clip {
    pub voice: String,
    pub audio: AudioArtifact,
}

/// Turns requests into audio. Holds no per-call state; the catalog is the
/// only thing cached across calls.
#[derive(Clone)]
pub struct Synthesizer {
    catalog: VoiceCatalog,
    provider: Arc<dyn SpeechProvider>,
    stitcher: Arc<dyn AudioStitcher>,
    timeout: Duration,
}

impl Synthesizer {
    pub fn new(
        catalog: VoiceCatalog,
        provider: Arc<dyn SpeechProvider>,
        stitcher: Arc<dyn AudioStitcher>,
        timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            provider,
            stitcher,
            timeout,
        }
    }

    pub fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    pub fn provider(&self) -> &Arc<dyn SpeechProvider> {
        &self.provider
    }

    pub fn stitcher(&self) -> &Arc<dyn AudioStitcher> {
        &self.stitcher
    }

    /// Validate a request and resolve its voice without touching the
    /// provider's synthesis endpoint
    async fn prepare(&self, request: &SynthesisRequest) -> Result<Prepared> {
        if request.text.trim().is_empty() {
            return Err(TtsError::EmptyInput);
        }

        let voice = tokio::time::timeout(self.timeout, self.catalog.resolve(&request.voice))
            .await
            .map_err(|_| TtsError::Timeout {
                operation: "voice catalog lookup",
                after: self.timeout,
            })??;

        Ok(Prepared {
            input: SpeechInput {
                ssml: ssml::wrap_with_rate(&request.text, request.rate),
                voice_id: voice.id.clone(),
                engine: voice.preferred_engine(),
                language_code: voice.language_code.clone(),
            },
            voice: voice.name,
        })
    }

    async fn render(&self, prepared: Prepared) -> Result<Clip> {
        let input = &prepared.input;
        debug!(voice = %input.voice_id, engine = %input.engine, "Synthesizing");

        let audio = tokio::time::timeout(self.timeout, self.provider.synthesize(input))
            .await
            .map_err(|_| TtsError::Timeout {
                operation: "speech synthesis",
                after: self.timeout,
            })??;

        if audio.is_empty() {
            return Err(TtsError::ProviderError(format!(
                "provider returned no audio for voice {}",
                input.voice_id
            )));
        }

        Ok(Clip {
            voice: prepared.voice,
            audio,
        })
    }

    /// Synthesize one text. Returns the provider's raw audio.
    pub async fn synthesize(&self, request: &SynthesisRequest) -> Result<Clip> {
        let prepared = self.prepare(request).await?;
        self.render(prepared).await
    }

    /// Synthesize both legs and join them as first, pause, second
    pub async fn synthesize_pair(&self, request: &PairRequest) -> Result<Clip> {
        if request.first.text.trim().is_empty() || request.second.text.trim().is_empty() {
            return Err(TtsError::EmptyInput);
        }

        // Both legs are validated before either is sent
        let first = self.prepare(&request.first).await?;
        let second = self.prepare(&request.second).await?;

        let first = self.render(first).await?;
        let second = self.render(second).await?;

        let audio = self
            .stitcher
            .concatenate(&[first.audio, second.audio], request.pause.as_duration())
            .await?;
        info!(
            first = %first.voice,
            second = %second.voice,
            pause_ms = request.pause.as_millis(),
            duration_ms = audio.duration_ms(),
            "Stitched pair"
        );

        Ok(Clip {
            voice: format!("{}+{}", first.voice, second.voice),
            audio,
        })
    }

    /// Run every check `synthesize` or `synthesize_pair` would run before
    /// calling the provider
    pub async fn validate(&self, item: &BatchItem) -> Result<()> {
        match item {
            BatchItem::Single(request) => {
                self.prepare(request).await?;
            }
            BatchItem::Pair(pair) => {
                if pair.first.text.trim().is_empty() || pair.second.text.trim().is_empty() {
                    return Err(TtsError::EmptyInput);
                }
                self.prepare(&pair.first).await?;
                self.prepare(&pair.second).await?;
            }
        }
        Ok(())
    }

    /// Encode a clip for writing to disk; already-encoded clips pass through
    pub async fn encode(&self, clip: Clip) -> Result<Clip> {
        if clip.audio.format.encoding == Encoding::Mp3 {
            return Ok(clip);
        }
        let audio = self
            .stitcher
            .concatenate(std::slice::from_ref(&clip.audio), Duration::ZERO)
            .await?;
        Ok(Clip {
            voice: clip.voice,
            audio,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{default_voices, MockBehavior, MockSpeechProvider, MockStitcher};
    use crate::types::{PauseDuration, SpeechRate};

    fn synthesizer(provider: MockSpeechProvider) -> Synthesizer {
        Synthesizer::new(
            VoiceCatalog::fixed(default_voices()),
            Arc::new(provider),
            Arc::new(MockStitcher::new()),
            Duration::from_millis(200),
        )
    }

    #[tokio::test]
    async fn empty_text_never_reaches_provider() {
        let provider = MockSpeechProvider::new();
        let synth = synthesizer(provider.clone());

        let err = synth
            .synthesize(&SynthesisRequest::new("   ", "joanna", SpeechRate::default()))
            .await
            .unwrap_err();

        assert!(matches!(err, TtsError::EmptyInput));
        assert_eq!(provider.synthesize_calls(), 0);
    }

    #[tokio::test]
    async fn uses_best_engine_and_prosody() {
        let provider = MockSpeechProvider::new();
        let synth = synthesizer(provider.clone());

        synth
            .synthesize(&SynthesisRequest::new(
                "hello",
                "JOANNA",
                SpeechRate::new(75).unwrap(),
            ))
            .await
            .unwrap();

        let inputs = provider.inputs();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].voice_id, "Joanna");
        assert_eq!(inputs[0].engine, crate::voice::Engine::Generative);
        assert!(inputs[0].ssml.contains("rate=\"75%\""));
    }

    #[tokio::test]
    async fn provider_errors_pass_through() {
        let provider = MockSpeechProvider::with_behavior(MockBehavior::AlwaysProviderError {
            message: "AccessDeniedException: not authorized".to_string(),
        });
        let synth = synthesizer(provider);

        let err = synth
            .synthesize(&SynthesisRequest::new("hi", "hans", SpeechRate::default()))
            .await
            .unwrap_err();

        assert!(
            matches!(err, TtsError::ProviderError(msg) if msg == "AccessDeniedException: not authorized")
        );
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let synth = synthesizer(MockSpeechProvider::with_behavior(MockBehavior::Hang));

        let err = synth
            .synthesize(&SynthesisRequest::new("hi", "hans", SpeechRate::default()))
            .await
            .unwrap_err();

        assert!(matches!(err, TtsError::Timeout { .. }));
    }

    #[tokio::test]
    async fn pair_with_empty_leg_skips_provider() {
        let provider = MockSpeechProvider::new();
        let synth = synthesizer(provider.clone());

        let err = synth
            .synthesize_pair(&PairRequest {
                first: SynthesisRequest::new("strong", "joanna", SpeechRate::default()),
                second: SynthesisRequest::new("", "hans", SpeechRate::default()),
                pause: PauseDuration::default(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, TtsError::EmptyInput));
        assert_eq!(provider.synthesize_calls(), 0);
    }

    #[tokio::test]
    async fn pair_with_unknown_voice_skips_provider() {
        let provider = MockSpeechProvider::new();
        let synth = synthesizer(provider.clone());

        let err = synth
            .synthesize_pair(&PairRequest {
                first: SynthesisRequest::new("strong", "joanna", SpeechRate::default()),
                second: SynthesisRequest::new("stark", "nonexistent", SpeechRate::default()),
                pause: PauseDuration::default(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, TtsError::UnknownVoice { ref name, .. } if name == "nonexistent"));
        assert_eq!(provider.synthesize_calls(), 0);
    }

    #[tokio::test]
    async fn hanging_catalog_times_out() {
        let provider = MockSpeechProvider::with_behavior(MockBehavior::Hang);
        let synth = Synthesizer::new(
            VoiceCatalog::new(Arc::new(provider.clone())),
            Arc::new(provider.clone()),
            Arc::new(MockStitcher::new()),
            Duration::from_millis(200),
        );

        let err = synth
            .synthesize(&SynthesisRequest::new("hi", "hans", SpeechRate::default()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TtsError::Timeout {
                operation: "voice catalog lookup",
                ..
            }
        ));
        assert_eq!(provider.describe_calls(), 1);
        assert_eq!(provider.synthesize_calls(), 0);
    }

    #[tokio::test]
    async fn encode_passes_mp3_through() {
        let stitcher = MockStitcher::new();
        let synth = Synthesizer::new(
            VoiceCatalog::fixed(default_voices()),
            Arc::new(MockSpeechProvider::new()),
            Arc::new(stitcher.clone()),
            Duration::from_secs(1),
        );

        let clip = synth
            .synthesize(&SynthesisRequest::new("hi", "hans", SpeechRate::default()))
            .await
            .unwrap();
        let encoded = synth.encode(clip).await.unwrap();
        assert_eq!(encoded.audio.format.encoding, Encoding::Mp3);
        assert_eq!(stitcher.calls(), 1);

        synth.encode(encoded).await.unwrap();
        assert_eq!(stitcher.calls(), 1);
    }
}
