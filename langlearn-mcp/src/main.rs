use anyhow::Result;
use langlearn_core::{SettingsManager, TtsService};
use langlearn_mcp::LanglearnServer;
use rmcp::ServiceExt;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Overrides the settings file location
const SETTINGS_ENV: &str = "LANGLEARN_TTS_SETTINGS";

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = setup_tracing()?;

    let manager = match std::env::var_os(SETTINGS_ENV) {
        Some(path) => SettingsManager::from_path(path.into())?,
        None => SettingsManager::new()?,
    };
    info!("Loaded settings from {:?}", manager.path());

    let server = LanglearnServer::new(TtsService::from_settings(manager.settings()).await);
    let running = server.serve(rmcp::transport::stdio()).await?;
    info!("MCP server listening on stdio");

    let reason = running.waiting().await?;
    info!("MCP server stopped: {:?}", reason);
    Ok(())
}

/// Stdout carries the protocol, so logs only go to the log file and stderr
fn setup_tracing() -> Result<WorkerGuard> {
    use tracing_subscriber::fmt;

    let log_dir = SettingsManager::home_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let appender = tracing_appender::rolling::daily(&log_dir, "langlearn-tts.log");
    let (file, guard) = tracing_appender::non_blocking(appender);

    let file_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

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
                .with_ansi(false)
                .with_target(false)
                .with_filter(EnvFilter::new("warn")),
        )
        .init();

    Ok(guard)
}
