pub mod audio;
pub mod doctor;
pub mod error;
pub mod mock;
pub mod params;
pub mod service;
pub mod settings;
pub mod synth;
pub mod tts;
pub mod types;
pub mod voice;

// Public library API used by the CLI and the MCP server.
pub use error::{Result, TtsError};
pub use service::TtsService;
pub use settings::{Settings, SettingsManager};
pub use types::{BatchReport, SynthesisResult};
