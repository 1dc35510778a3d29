use std::time::Duration;

use async_trait::async_trait;

use super::AudioArtifact;
use crate::error::Result;

/// External tool that joins clips into one encoded file
#[async_trait]
pub trait AudioStitcher: Send + Sync {
    /// Concatenate clips in order with `gap` of silence between neighbours.
    /// A single clip with no gap is a plain transcode.
    async fn concatenate(&self, clips: &[AudioArtifact], gap: Duration) -> Result<AudioArtifact>;

    /// Version string of the underlying tool, failing if it is not installed
    async fn version(&self) -> Result<String>;
}

/// Logical duration of a concatenation
pub fn stitched_duration(clips: &[AudioArtifact], gap: Duration) -> Duration {
    let gaps = clips.len().saturating_sub(1) as u32;
    clips.iter().map(|c| c.duration).sum::<Duration>() + gap * gaps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaps_only_between_clips() {
        let clip = AudioArtifact::from_pcm16(vec![0; 3_200], 16_000, 1);
        let gap = Duration::from_millis(500);

        assert_eq!(stitched_duration(&[], gap), Duration::ZERO);
        assert_eq!(
            stitched_duration(std::slice::from_ref(&clip), gap),
            Duration::from_millis(100)
        );
        assert_eq!(
            stitched_duration(&[clip.clone(), clip.clone(), clip], gap),
            Duration::from_millis(1_300)
        );
    }
}
