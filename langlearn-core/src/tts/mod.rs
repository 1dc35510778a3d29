pub mod aws_polly;
pub mod provider;
pub mod ssml;

pub use provider::{SpeechInput, SpeechProvider};
