//! Concatenation and MP3 encoding through the ffmpeg binary

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use super::stitcher::{stitched_duration, AudioStitcher};
use super::{AudioArtifact, AudioFormat, Encoding};
use crate::error::{Result, TtsError};

const MP3_BITRATE: &str = "64k";

#[derive(Debug, Clone)]
pub struct FfmpegConfig {
    pub binary: PathBuf,
    pub timeout: Duration,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("ffmpeg"),
            timeout: Duration::from_secs(60),
        }
    }
}

pub struct Ffmpeg {
    config: FfmpegConfig,
}

impl Ffmpeg {
    pub fn new(config: FfmpegConfig) -> Self {
        Self { config }
    }

    async fn run(&self, args: &[String], operation: &'static str) -> Result<Vec<u8>> {
        debug!(binary = ?self.config.binary, ?args, "Running ffmpeg");

        let child = Command::new(&self.config.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let output = tokio::time::timeout(self.config.timeout, child.wait_with_output())
            .await
            .map_err(|_| TtsError::Timeout {
                operation,
                after: self.config.timeout,
            })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(status = ?output.status, %stderr, "ffmpeg failed");
            return Err(TtsError::StitchFailed(format!(
                "{} exited with {}: {stderr}",
                self.config.binary.display(),
                output.status
            )));
        }

        Ok(output.stdout)
    }

    fn spawn_error(&self, e: std::io::Error) -> TtsError {
        if e.kind() == ErrorKind::NotFound {
            TtsError::StitchFailed(format!(
                "{} not found; install ffmpeg or set audio.ffmpeg in settings",
                self.config.binary.display()
            ))
        } else {
            TtsError::StitchFailed(format!(
                "failed to start {}: {e}",
                self.config.binary.display()
            ))
        }
    }
}

/// Input flags for one clip file
fn input_args(format: &AudioFormat, path: &Path) -> Vec<String> {
    let mut args = Vec::new();
    if format.encoding == Encoding::Pcm16 {
        args.extend([
            "-f".to_string(),
            "s16le".to_string(),
            "-ar".to_string(),
            format.sample_rate.to_string(),
            "-ac".to_string(),
            format.channels.to_string(),
        ]);
    }
    args.push("-i".to_string());
    args.push(path.display().to_string());
    args
}

fn silence_args(format: &AudioFormat, gap: Duration) -> Vec<String> {
    let layout = if format.channels >= 2 { "stereo" } else { "mono" };
    vec![
        "-f".to_string(),
        "lavfi".to_string(),
        "-t".to_string(),
        format!("{:.3}", gap.as_secs_f64()),
        "-i".to_string(),
        format!("anullsrc=r={}:cl={layout}", format.sample_rate),
    ]
}

/// Build the full ffmpeg argument list. Inputs alternate clip, silence,
/// clip, ... and are joined with the concat filter in that order.
pub(crate) fn build_args(
    clips: &[(AudioFormat, PathBuf)],
    gap: Duration,
    output: &Path,
) -> Vec<String> {
    let mut args: Vec<String> = ["-hide_banner", "-loglevel", "error", "-y"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let target = clips[0].0;
    let mut inputs = 0usize;
    for (i, (format, path)) in clips.iter().enumerate() {
        if i > 0 && !gap.is_zero() {
            args.extend(silence_args(&target, gap));
            inputs += 1;
        }
        args.extend(input_args(format, path));
        inputs += 1;
    }

    if inputs > 1 {
        let streams: String = (0..inputs).map(|i| format!("[{i}:a]")).collect();
        args.push("-filter_complex".to_string());
        args.push(format!("{streams}concat=n={inputs}:v=0:a=1[out]"));
        args.push("-map".to_string());
        args.push("[out]".to_string());
    }

    args.extend([
        "-ar".to_string(),
        target.sample_rate.to_string(),
        "-ac".to_string(),
        target.channels.to_string(),
        "-codec:a".to_string(),
        "libmp3lame".to_string(),
        "-b:a".to_string(),
        MP3_BITRATE.to_string(),
        output.display().to_string(),
    ]);
    args
}

#[async_trait]
impl AudioStitcher for Ffmpeg {
    async fn concatenate(&self, clips: &[AudioArtifact], gap: Duration) -> Result<AudioArtifact> {
        let Some(first) = clips.first() else {
            return Err(TtsError::StitchFailed("no clips to concatenate".to_string()));
        };

        let workdir = tempfile::tempdir()?;
        let mut inputs = Vec::with_capacity(clips.len());
        for (i, clip) in clips.iter().enumerate() {
            let ext = match clip.format.encoding {
                Encoding::Pcm16 => "pcm",
                Encoding::Mp3 => "mp3",
            };
            let path = workdir.path().join(format!("clip_{i:04}.{ext}"));
            tokio::fs::write(&path, &clip.data).await?;
            inputs.push((clip.format, path));
        }

        let output = workdir.path().join("out.mp3");
        self.run(&build_args(&inputs, gap, &output), "ffmpeg concatenate")
            .await?;
        let data = tokio::fs::read(&output).await?;

        Ok(AudioArtifact {
            data,
            duration: stitched_duration(clips, gap),
            format: AudioFormat::mp3(first.format.sample_rate, first.format.channels),
        })
    }

    async fn version(&self) -> Result<String> {
        let stdout = self
            .run(&["-version".to_string()], "ffmpeg version probe")
            .await?;
        let text = String::from_utf8_lossy(&stdout);
        Ok(text.lines().next().unwrap_or_default().trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcm() -> AudioFormat {
        AudioFormat::pcm16(16_000, 1)
    }

    #[test]
    fn single_clip_is_plain_transcode() {
        let args = build_args(
            &[(pcm(), PathBuf::from("/tmp/a.pcm"))],
            Duration::ZERO,
            Path::new("/tmp/out.mp3"),
        );

        assert!(!args.contains(&"-filter_complex".to_string()));
        assert!(args.contains(&"s16le".to_string()));
        assert_eq!(args.last().unwrap(), "/tmp/out.mp3");
    }

    #[test]
    fn pair_places_silence_between_legs() {
        let args = build_args(
            &[
                (pcm(), PathBuf::from("/tmp/first.pcm")),
                (pcm(), PathBuf::from("/tmp/second.pcm")),
            ],
            Duration::from_millis(750),
            Path::new("/tmp/out.mp3"),
        );

        let first = args.iter().position(|a| a == "/tmp/first.pcm").unwrap();
        let silence = args
            .iter()
            .position(|a| a.starts_with("anullsrc"))
            .unwrap();
        let second = args.iter().position(|a| a == "/tmp/second.pcm").unwrap();
        assert!(first < silence && silence < second);

        assert!(args.contains(&"0.750".to_string()));
        assert!(args.contains(&"[0:a][1:a][2:a]concat=n=3:v=0:a=1[out]".to_string()));
    }

    #[test]
    fn zero_gap_skips_silence_inputs() {
        let args = build_args(
            &[
                (pcm(), PathBuf::from("/tmp/a.pcm")),
                (AudioFormat::mp3(16_000, 1), PathBuf::from("/tmp/b.mp3")),
            ],
            Duration::ZERO,
            Path::new("/tmp/out.mp3"),
        );

        assert!(!args.iter().any(|a| a.starts_with("anullsrc")));
        assert!(args.contains(&"[0:a][1:a]concat=n=2:v=0:a=1[out]".to_string()));
    }

    #[tokio::test]
    async fn missing_binary_is_stitch_failure() {
        let ffmpeg = Ffmpeg::new(FfmpegConfig {
            binary: PathBuf::from("/nonexistent/ffmpeg-binary"),
            timeout: Duration::from_secs(5),
        });

        let err = ffmpeg.version().await.unwrap_err();
        assert!(matches!(err, TtsError::StitchFailed(msg) if msg.contains("not found")));
    }
}
