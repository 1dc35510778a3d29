//! The operations both front ends expose. Parameters are validated here,
//! before anything reaches the provider or the audio tool.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::audio::ffmpeg::{Ffmpeg, FfmpegConfig};
use crate::audio::playback::Player;
use crate::audio::writer::write_atomic;
use crate::audio::AudioStitcher;
use crate::doctor::{Doctor, DoctorReport};
use crate::error::Result;
use crate::params::{BatchParams, PairBatchParams, PairParams, SynthesizeParams, VoicesParams};
use crate::settings::{DefaultsSettings, Settings};
use crate::synth::{naming, BatchRunner, Synthesizer};
use crate::tts::aws_polly::{AwsPolly, AwsPollyConfig};
use crate::tts::SpeechProvider;
use crate::types::{
    BatchItem, BatchReport, BatchRequest, MergeStrategy, PairRequest, PauseDuration, SpeechRate,
    SynthesisRequest, SynthesisResult,
};
use crate::voice::{VoiceCatalog, VoiceDescriptor};

pub struct TtsService {
    synth: Synthesizer,
    player: Player,
    defaults: DefaultsSettings,
    batch_concurrency: usize,
    probe_timeout: Duration,
}

impl TtsService {
    /// Service backed by AWS Polly and the ffmpeg binary
    pub async fn from_settings(settings: &Settings) -> Self {
        let provider = AwsPolly::new(AwsPollyConfig {
            profile: settings.polly.profile.clone(),
            region: settings.polly.region.clone(),
            timeout: settings.timeouts.probe(),
        })
        .await;

        let stitcher = Ffmpeg::new(FfmpegConfig {
            binary: settings
                .audio
                .ffmpeg
                .clone()
                .unwrap_or_else(|| PathBuf::from("ffmpeg")),
            timeout: settings.timeouts.stitch(),
        });

        Self::with_backends(settings, Arc::new(provider), Arc::new(stitcher))
    }

    pub fn with_backends(
        settings: &Settings,
        provider: Arc<dyn SpeechProvider>,
        stitcher: Arc<dyn AudioStitcher>,
    ) -> Self {
        let catalog = VoiceCatalog::new(provider.clone());
        let player = match &settings.audio.player {
            Some(program) => Player::new(program.clone(), settings.audio.player_args.clone()),
            None => Player::platform_default(),
        };

        Self {
            synth: Synthesizer::new(catalog, provider, stitcher, settings.timeouts.synthesis()),
            player,
            defaults: settings.defaults.clone(),
            batch_concurrency: settings.batch_concurrency,
            probe_timeout: settings.timeouts.probe(),
        }
    }

    pub fn with_player(mut self, player: Player) -> Self {
        self.player = player;
        self
    }

    pub fn synthesizer(&self) -> &Synthesizer {
        &self.synth
    }

    fn rate(&self, rate: Option<u16>) -> Result<SpeechRate> {
        SpeechRate::new(rate.unwrap_or(self.defaults.rate))
    }

    fn pause(&self, pause_ms: Option<u64>) -> Result<PauseDuration> {
        PauseDuration::from_millis(pause_ms.unwrap_or(self.defaults.pause_ms))
    }

    pub fn output_dir(&self, explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| self.defaults.output_dir.clone())
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    fn finish(&self, result: &SynthesisResult, auto_play: bool) {
        info!(path = ?result.file_path, duration_ms = result.duration_ms, "Wrote audio");
        if auto_play {
            self.player.play(&result.file_path);
        }
    }

    pub async fn synthesize(&self, params: SynthesizeParams) -> Result<SynthesisResult> {
        let voice = params.voice.unwrap_or_else(|| self.defaults.voice.clone());
        let request = SynthesisRequest::new(params.text, voice, self.rate(params.rate)?);

        let clip = self.synth.synthesize(&request).await?;
        let clip = self.synth.encode(clip).await?;

        let file_path = params.output.unwrap_or_else(|| {
            self.output_dir(None)
                .join(naming::single_filename(&request.voice, &request.text))
        });
        write_atomic(&file_path, &clip.audio.data)?;

        let result = SynthesisResult {
            file_path,
            text: request.text,
            voice: clip.voice,
            duration_ms: clip.audio.duration_ms(),
        };
        self.finish(&result, params.auto_play);
        Ok(result)
    }

    pub async fn synthesize_pair(&self, params: PairParams) -> Result<SynthesisResult> {
        let rate = self.rate(params.rate)?;
        let request = PairRequest {
            first: SynthesisRequest::new(
                params.text1,
                params.voice1.unwrap_or_else(|| self.defaults.voice1.clone()),
                rate,
            ),
            second: SynthesisRequest::new(
                params.text2,
                params.voice2.unwrap_or_else(|| self.defaults.voice2.clone()),
                rate,
            ),
            pause: self.pause(params.pause_ms)?,
        };

        let clip = self.synth.synthesize_pair(&request).await?;

        let file_path = params.output.unwrap_or_else(|| {
            self.output_dir(None).join(naming::pair_filename(
                &request.first.text,
                &request.second.text,
            ))
        });
        write_atomic(&file_path, &clip.audio.data)?;

        let result = SynthesisResult {
            file_path,
            text: request.label(),
            voice: clip.voice,
            duration_ms: clip.audio.duration_ms(),
        };
        self.finish(&result, params.auto_play);
        Ok(result)
    }

    pub async fn synthesize_batch(&self, params: BatchParams) -> Result<BatchReport> {
        let rate = self.rate(params.rate)?;
        let voice = params.voice.unwrap_or_else(|| self.defaults.voice.clone());
        let request = BatchRequest {
            items: params
                .texts
                .into_iter()
                .map(|text| BatchItem::Single(SynthesisRequest::new(text, voice.clone(), rate)))
                .collect(),
            merge: MergeStrategy::from_flag(params.merge),
            pause: self.pause(params.pause_ms)?,
        };

        self.run_batch(request, params.output_dir, params.auto_play)
            .await
    }

    pub async fn synthesize_pair_batch(&self, params: PairBatchParams) -> Result<BatchReport> {
        let rate = self.rate(params.rate)?;
        let pause = self.pause(params.pause_ms)?;
        let voice1 = params.voice1.unwrap_or_else(|| self.defaults.voice1.clone());
        let voice2 = params.voice2.unwrap_or_else(|| self.defaults.voice2.clone());
        let request = BatchRequest {
            items: params
                .pairs
                .into_iter()
                .map(|(first, second)| {
                    BatchItem::Pair(PairRequest {
                        first: SynthesisRequest::new(first, voice1.clone(), rate),
                        second: SynthesisRequest::new(second, voice2.clone(), rate),
                        pause,
                    })
                })
                .collect(),
            merge: MergeStrategy::from_flag(params.merge),
            pause,
        };

        self.run_batch(request, params.output_dir, params.auto_play)
            .await
    }

    async fn run_batch(
        &self,
        request: BatchRequest,
        output_dir: Option<PathBuf>,
        auto_play: bool,
    ) -> Result<BatchReport> {
        let output_dir = self.output_dir(output_dir);
        let report = BatchRunner::new(&self.synth, self.batch_concurrency)
            .run(&request, &output_dir)
            .await?;

        // Separate files are never auto-played; they would all start at once
        if request.merge == MergeStrategy::OneFilePerBatch {
            if let Some(merged) = report.results.first() {
                self.finish(merged, auto_play);
            }
        }
        Ok(report)
    }

    pub async fn voices(&self, params: VoicesParams) -> Result<Vec<VoiceDescriptor>> {
        let voices = self.synth.catalog().voices().await?;
        let Some(language) = params.language.map(|l| l.to_lowercase()) else {
            return Ok(voices);
        };
        Ok(voices
            .into_iter()
            .filter(|v| v.language_code.to_lowercase().starts_with(&language))
            .collect())
    }

    pub async fn doctor(&self, output_dir: Option<PathBuf>) -> DoctorReport {
        Doctor {
            provider: self.synth.provider().as_ref(),
            stitcher: self.synth.stitcher().as_ref(),
            player: &self.player,
            output_dir: self.output_dir(output_dir),
            timeout: self.probe_timeout,
        }
        .run()
        .await
    }
}
