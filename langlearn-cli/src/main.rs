use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

mod commands;

use langlearn_core::{SettingsManager, TtsService};

use crate::commands::Command;

#[derive(Parser, Debug)]
#[command(name = "langlearn-tts")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Language-learning audio from AWS Polly: single phrases, pairs and batches")]
struct Args {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this settings file instead of ~/.langlearn-tts/settings.toml
    #[arg(long, value_name = "PATH", global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let _guard = setup_tracing(args.verbose)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<ExitCode> {
    info!(
        "CLI startup: command={:?}, settings={:?}",
        args.command, args.settings
    );

    let manager = match args.settings {
        Some(path) => SettingsManager::from_path(path)?,
        None => SettingsManager::new()?,
    };
    let service = TtsService::from_settings(manager.settings()).await;

    let code = args.command.run(&service).await?;
    info!("CLI finished with {:?}", code);
    Ok(code)
}

/// Logs go to a daily file under ~/.langlearn-tts/logs and, filtered, to
/// stderr. Stdout is reserved for output paths.
fn setup_tracing(verbose: bool) -> Result<WorkerGuard> {
    use tracing_subscriber::fmt;

    let log_dir = SettingsManager::home_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let appender = tracing_appender::rolling::daily(&log_dir, "langlearn-tts.log");
    let (file, guard) = tracing_appender::non_blocking(appender);

    let file_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_filter = EnvFilter::new(if verbose { "debug" } else { "warn" });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(file_filter),
        )
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(stderr_filter),
        )
        .init();

    info!("Tracing initialized in {:?}", log_dir);
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "langlearn-tts",
            "voices",
            "--language",
            "de",
            "-v",
            "--settings",
            "/tmp/custom.toml",
        ])
        .unwrap();

        assert!(args.verbose);
        assert_eq!(args.settings, Some(PathBuf::from("/tmp/custom.toml")));
        assert!(matches!(
            args.command,
            Command::Voices { language: Some(ref l) } if l == "de"
        ));
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Args::try_parse_from(["langlearn-tts"]).is_err());
    }
}
