pub mod ffmpeg;
pub mod playback;
pub mod stitcher;
pub mod writer;

pub use stitcher::AudioStitcher;

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Signed 16-bit little-endian samples
    Pcm16,
    Mp3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub encoding: Encoding,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioFormat {
    pub fn pcm16(sample_rate: u32, channels: u16) -> Self {
        Self {
            encoding: Encoding::Pcm16,
            sample_rate,
            channels,
        }
    }

    pub fn mp3(sample_rate: u32, channels: u16) -> Self {
        Self {
            encoding: Encoding::Mp3,
            sample_rate,
            channels,
        }
    }
}

/// Audio produced by synthesis or stitching. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    pub data: Vec<u8>,
    pub duration: Duration,
    pub format: AudioFormat,
}

impl AudioArtifact {
    /// Wrap raw 16-bit PCM, deriving the duration from the sample count
    pub fn from_pcm16(data: Vec<u8>, sample_rate: u32, channels: u16) -> Self {
        let frame_bytes = 2 * u64::from(channels.max(1));
        let frames = data.len() as u64 / frame_bytes;
        let duration = Duration::from_micros(frames * 1_000_000 / u64::from(sample_rate.max(1)));

        Self {
            data,
            duration,
            format: AudioFormat::pcm16(sample_rate, channels),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcm_duration_from_sample_count() {
        // One second of 16 kHz mono 16-bit audio
        let clip = AudioArtifact::from_pcm16(vec![0; 32_000], 16_000, 1);
        assert_eq!(clip.duration, Duration::from_secs(1));

        let stereo = AudioArtifact::from_pcm16(vec![0; 32_000], 16_000, 2);
        assert_eq!(stereo.duration_ms(), 500);
    }
}
