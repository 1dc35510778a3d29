//! Parameters shared by the CLI and the MCP tools. Every optional field
//! falls back to the `[defaults]` section of the settings.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SynthesizeParams {
    /// Text to speak
    pub text: String,
    /// Voice name, case-insensitive (e.g. joanna, hans, tatyana, seoyeon)
    #[serde(default)]
    pub voice: Option<String>,
    /// Speech rate as a percentage of natural speed (20-200)
    #[serde(default)]
    pub rate: Option<u16>,
    /// Output file path; generated from the voice and text when omitted
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Play the file once it has been written
    #[serde(default)]
    pub auto_play: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PairParams {
    /// First text, usually in the learner's native language
    pub text1: String,
    /// Second text, usually in the language being learned
    pub text2: String,
    /// Voice for the first text
    #[serde(default)]
    pub voice1: Option<String>,
    /// Voice for the second text
    #[serde(default)]
    pub voice2: Option<String>,
    /// Speech rate as a percentage of natural speed (20-200)
    #[serde(default)]
    pub rate: Option<u16>,
    /// Silence between the two texts in milliseconds
    #[serde(default)]
    pub pause_ms: Option<u64>,
    /// Output file path; generated from the texts when omitted
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Play the file once it has been written
    #[serde(default)]
    pub auto_play: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct BatchParams {
    /// Texts to synthesize, in order
    pub texts: Vec<String>,
    /// Voice used for every text
    #[serde(default)]
    pub voice: Option<String>,
    /// Speech rate as a percentage of natural speed (20-200)
    #[serde(default)]
    pub rate: Option<u16>,
    /// Directory for the output files
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Merge everything into a single file instead of one file per text
    #[serde(default)]
    pub merge: bool,
    /// Silence between merged segments in milliseconds
    #[serde(default)]
    pub pause_ms: Option<u64>,
    /// Play the merged file once it has been written
    #[serde(default)]
    pub auto_play: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PairBatchParams {
    /// Pairs of [first, second] texts, in order
    pub pairs: Vec<(String, String)>,
    /// Voice for the first text of each pair
    #[serde(default)]
    pub voice1: Option<String>,
    /// Voice for the second text of each pair
    #[serde(default)]
    pub voice2: Option<String>,
    /// Speech rate as a percentage of natural speed (20-200)
    #[serde(default)]
    pub rate: Option<u16>,
    /// Silence inside each pair and between merged pairs, in milliseconds
    #[serde(default)]
    pub pause_ms: Option<u64>,
    /// Directory for the output files
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Merge every pair into a single file
    #[serde(default)]
    pub merge: bool,
    /// Play the merged file once it has been written
    #[serde(default)]
    pub auto_play: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct VoicesParams {
    /// Only list voices whose language code starts with this (e.g. "de" or "en-GB")
    #[serde(default)]
    pub language: Option<String>,
}
