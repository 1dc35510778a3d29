pub mod config;
pub mod manager;


pub use config::{AudioSettings, DefaultsSettings, PollySettings, Settings, TimeoutSettings};
pub use manager::SettingsManager;
