pub mod catalog;

pub use catalog::VoiceCatalog;

use serde::{Deserialize, Serialize};

/// Provider quality class, ordered from lowest to highest quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Engine {
    Standard,
    Neural,
    LongForm,
    Generative,
}

impl Engine {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Neural => "neural",
            Self::LongForm => "long-form",
            Self::Generative => "generative",
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A voice as reported by the provider for the configured region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceDescriptor {
    pub id: String,
    pub name: String,
    pub language_code: String,
    #[serde(default)]
    pub language_name: String,
    #[serde(default)]
    pub gender: String,
    pub engines: Vec<Engine>,
}

impl VoiceDescriptor {
    /// Best engine the voice supports. Voices that report no engines are
    /// assumed to be standard-only.
    pub fn preferred_engine(&self) -> Engine {
        self.engines
            .iter()
            .copied()
            .max()
            .unwrap_or(Engine::Standard)
    }

    pub fn supports(&self, engine: Engine) -> bool {
        self.engines.contains(&engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(engines: Vec<Engine>) -> VoiceDescriptor {
        VoiceDescriptor {
            id: "Ruth".to_string(),
            name: "Ruth".to_string(),
            language_code: "en-US".to_string(),
            language_name: "US English".to_string(),
            gender: "Female".to_string(),
            engines,
        }
    }

    #[test]
    fn prefers_highest_tier() {
        let v = voice(vec![Engine::Neural, Engine::Generative, Engine::LongForm]);
        assert_eq!(v.preferred_engine(), Engine::Generative);

        let v = voice(vec![Engine::Standard, Engine::Neural]);
        assert_eq!(v.preferred_engine(), Engine::Neural);
    }

    #[test]
    fn falls_back_to_standard() {
        assert_eq!(voice(Vec::new()).preferred_engine(), Engine::Standard);
        assert_eq!(
            voice(vec![Engine::Standard]).preferred_engine(),
            Engine::Standard
        );
    }
}
