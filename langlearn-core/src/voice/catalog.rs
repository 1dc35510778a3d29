use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::VoiceDescriptor;
use crate::error::{Result, TtsError};
use crate::tts::SpeechProvider;

/// Voices keyed by lower-cased name; ids are matched as a fallback
type VoiceIndex = BTreeMap<String, VoiceDescriptor>;

/// Process-lifetime cache of the provider's voice list. Owned explicitly and
/// shared by cloning, so tests can hand in a fixed catalog.
#[derive(Clone)]
pub struct VoiceCatalog {
    provider: Option<Arc<dyn SpeechProvider>>,
    voices: Arc<OnceCell<VoiceIndex>>,
}

impl VoiceCatalog {
    /// Catalog filled from the provider on first lookup
    pub fn new(provider: Arc<dyn SpeechProvider>) -> Self {
        Self {
            provider: Some(provider),
            voices: Arc::new(OnceCell::new()),
        }
    }

    /// Catalog that never calls a provider
    pub fn fixed(voices: Vec<VoiceDescriptor>) -> Self {
        Self {
            provider: None,
            voices: Arc::new(OnceCell::new_with(Some(index(voices)))),
        }
    }

    async fn index(&self) -> Result<&VoiceIndex> {
        self.voices
            .get_or_try_init(|| async {
                let Some(provider) = &self.provider else {
                    return Ok(VoiceIndex::new());
                };
                debug!("Fetching voice catalog from provider");
                let voices = provider.describe_voices().await?;
                info!(count = voices.len(), "Voice catalog loaded");
                Ok::<_, TtsError>(index(voices))
            })
            .await
    }

    /// Resolve a case-insensitive voice name or id
    pub async fn resolve(&self, name: &str) -> Result<VoiceDescriptor> {
        let voices = self.index().await?;
        let key = name.trim().to_lowercase();

        if let Some(voice) = voices.get(&key) {
            return Ok(voice.clone());
        }

        voices
            .values()
            .find(|v| v.id.to_lowercase() == key)
            .cloned()
            .ok_or_else(|| TtsError::UnknownVoice {
                name: name.to_string(),
                available: voices.keys().cloned().collect::<Vec<_>>().join(", "),
            })
    }

    /// All voices, sorted by language then name
    pub async fn voices(&self) -> Result<Vec<VoiceDescriptor>> {
        let mut voices: Vec<VoiceDescriptor> = self.index().await?.values().cloned().collect();
        voices.sort_by(|a, b| {
            a.language_code
                .cmp(&b.language_code)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(voices)
    }
}

fn index(voices: Vec<VoiceDescriptor>) -> VoiceIndex {
    voices
        .into_iter()
        .map(|v| (v.name.to_lowercase(), v))
        .collect()
}
