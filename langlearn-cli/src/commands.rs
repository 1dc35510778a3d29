use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;
use langlearn_core::params::{
    BatchParams, PairBatchParams, PairParams, SynthesizeParams, VoicesParams,
};
use langlearn_core::synth::input;
use langlearn_core::voice::VoiceDescriptor;
use langlearn_core::{BatchReport, TtsService};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Synthesize one text to an MP3 file
    Synthesize {
        text: String,
        /// Voice name, case-insensitive
        #[arg(long)]
        voice: Option<String>,
        /// Speech rate in percent (20-200)
        #[arg(long)]
        rate: Option<u16>,
        /// Output file
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Play the file when done
        #[arg(long)]
        play: bool,
    },

    /// Synthesize two texts into one file with a pause between them
    SynthesizePair {
        text1: String,
        text2: String,
        #[arg(long)]
        voice1: Option<String>,
        #[arg(long)]
        voice2: Option<String>,
        #[arg(long)]
        rate: Option<u16>,
        /// Pause between the texts in milliseconds
        #[arg(long, value_name = "MS")]
        pause: Option<u64>,
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        #[arg(long)]
        play: bool,
    },

    /// Synthesize every text in a JSON array of strings
    SynthesizeBatch {
        input_file: PathBuf,
        #[arg(long)]
        voice: Option<String>,
        #[arg(long)]
        rate: Option<u16>,
        /// Output directory
        #[arg(short = 'd', long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
        /// Write one merged file instead of one file per text
        #[arg(long)]
        merge: bool,
        /// Pause between merged texts in milliseconds
        #[arg(long, value_name = "MS")]
        pause: Option<u64>,
    },

    /// Synthesize every pair in a JSON array of [first, second] arrays
    SynthesizePairBatch {
        input_file: PathBuf,
        #[arg(long)]
        voice1: Option<String>,
        #[arg(long)]
        voice2: Option<String>,
        #[arg(long)]
        rate: Option<u16>,
        /// Pause inside and between pairs in milliseconds
        #[arg(long, value_name = "MS")]
        pause: Option<u64>,
        #[arg(short = 'd', long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
        #[arg(long)]
        merge: bool,
    },

    /// List available voices
    Voices {
        /// Language code prefix, e.g. "de" or "en-GB"
        #[arg(long)]
        language: Option<String>,
    },

    /// Check ffmpeg, AWS credentials and the output directory
    Doctor {
        #[arg(short = 'd', long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },
}

impl Command {
    pub async fn run(self, service: &TtsService) -> Result<ExitCode> {
        match self {
            Command::Synthesize {
                text,
                voice,
                rate,
                output,
                play,
            } => {
                let result = service
                    .synthesize(SynthesizeParams {
                        text,
                        voice,
                        rate,
                        output,
                        auto_play: play,
                    })
                    .await?;
                println!("{}", result.file_path.display());
                Ok(ExitCode::SUCCESS)
            }
            Command::SynthesizePair {
                text1,
                text2,
                voice1,
                voice2,
                rate,
                pause,
                output,
                play,
            } => {
                let result = service
                    .synthesize_pair(PairParams {
                        text1,
                        text2,
                        voice1,
                        voice2,
                        rate,
                        pause_ms: pause,
                        output,
                        auto_play: play,
                    })
                    .await?;
                println!("{}", result.file_path.display());
                Ok(ExitCode::SUCCESS)
            }
            Command::SynthesizeBatch {
                input_file,
                voice,
                rate,
                output_dir,
                merge,
                pause,
            } => {
                let report = service
                    .synthesize_batch(BatchParams {
                        texts: input::read_texts(&input_file)?,
                        voice,
                        rate,
                        output_dir,
                        merge,
                        pause_ms: pause,
                        auto_play: false,
                    })
                    .await?;
                Ok(print_report(&report))
            }
            Command::SynthesizePairBatch {
                input_file,
                voice1,
                voice2,
                rate,
                pause,
                output_dir,
                merge,
            } => {
                let report = service
                    .synthesize_pair_batch(PairBatchParams {
                        pairs: input::read_pairs(&input_file)?,
                        voice1,
                        voice2,
                        rate,
                        pause_ms: pause,
                        output_dir,
                        merge,
                        auto_play: false,
                    })
                    .await?;
                Ok(print_report(&report))
            }
            Command::Voices { language } => {
                let voices = service.voices(VoicesParams { language }).await?;
                for voice in &voices {
                    println!("{}", voice_line(voice));
                }
                Ok(ExitCode::SUCCESS)
            }
            Command::Doctor { output_dir } => {
                let report = service.doctor(output_dir).await;
                print!("{report}");
                if report.is_healthy() {
                    Ok(ExitCode::SUCCESS)
                } else {
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

/// Paths on stdout, failures on stderr. Only a batch where nothing
/// succeeded is a failed run.
fn print_report(report: &BatchReport) -> ExitCode {
    for result in &report.results {
        println!("{}", result.file_path.display());
    }
    for failure in &report.failures {
        eprintln!(
            "item {} ({:?}) failed: {}",
            failure.index + 1,
            failure.text,
            failure.error
        );
    }

    if report.is_total_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn voice_line(voice: &VoiceDescriptor) -> String {
    let engines = voice
        .engines
        .iter()
        .map(|e| e.as_str())
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "{:<12} {:<7} {:<22} {:<7} {}",
        voice.name, voice.language_code, voice.language_name, voice.gender, engines
    )
}
