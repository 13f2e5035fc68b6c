use crate::config::Settings;
use anyhow::Context;
use file_rotate::compression::Compression;
use file_rotate::suffix::AppendCount;
use file_rotate::{ContentLimit, FileRotate};
use std::fs::{self, File};
use std::sync::Mutex;
use tracing::{Level, Subscriber};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

const CRATE_TARGET: &str = "homework_bot";

/// Installs the global subscriber. Call once, before anything logs.
pub fn init(settings: &Settings) -> anyhow::Result<()> {
    subscriber(settings)?
        .try_init()
        .context("failed to install log subscriber")
}

/// Full-run log (truncated at start, debug), size-rotated log (info) and stderr.
fn subscriber(settings: &Settings) -> anyhow::Result<impl Subscriber + Send + Sync> {
    fs::create_dir_all(&settings.log_dir)
        .with_context(|| format!("cannot create log dir {}", settings.log_dir.display()))?;

    let full_path = settings.log_dir.join(&settings.full_log_file);
    let full_log = File::create(&full_path)
        .with_context(|| format!("cannot open {}", full_path.display()))?;

    let rotating_log = FileRotate::new(
        settings.log_dir.join(&settings.log_file),
        AppendCount::new(settings.log_backups),
        ContentLimit::Bytes(settings.log_max_bytes),
        Compression::None,
        #[cfg(unix)]
        None,
    );

    let full_layer = fmt::layer()
        .with_ansi(false)
        .with_line_number(true)
        .with_writer(Mutex::new(full_log))
        .with_filter(
            Targets::new()
                .with_target(CRATE_TARGET, Level::DEBUG)
                .with_default(Level::INFO),
        );
    let rotating_layer = fmt::layer()
        .with_ansi(false)
        .with_line_number(true)
        .with_writer(Mutex::new(rotating_log))
        .with_filter(
            Targets::new()
                .with_target(CRATE_TARGET, Level::INFO)
                .with_default(Level::WARN),
        );
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    );

    Ok(tracing_subscriber::registry()
        .with(full_layer)
        .with(rotating_layer)
        .with(stderr_layer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn settings(dir: PathBuf) -> Settings {
        Settings {
            endpoint: crate::config::DEFAULT_ENDPOINT.to_string(),
            telegram_api_url: crate::config::DEFAULT_TELEGRAM_API_URL.to_string(),
            retry_time: 600,
            request_timeout: None,
            log_dir: dir,
            log_file: "homework_bot.log".to_string(),
            full_log_file: "main.log".to_string(),
            log_max_bytes: 1024,
            log_backups: 2,
        }
    }

    #[test]
    fn debug_lines_only_reach_the_full_log() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path().join("logs"));

        let subscriber = subscriber(&settings).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("no new status");
            tracing::info!("message sent");
        });

        let full = fs::read_to_string(dir.path().join("logs/main.log")).unwrap();
        let rotating = fs::read_to_string(dir.path().join("logs/homework_bot.log")).unwrap();
        assert!(full.contains("no new status"));
        assert!(full.contains("message sent"));
        assert!(!rotating.contains("no new status"));
        assert!(rotating.contains("message sent"));
    }

    #[test]
    fn full_log_is_truncated_on_start() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.log"), "previous run\n").unwrap();
        let settings = settings(dir.path().to_path_buf());

        drop(subscriber(&settings).unwrap());

        let full = fs::read_to_string(dir.path().join("main.log")).unwrap();
        assert!(!full.contains("previous run"));
    }
}
