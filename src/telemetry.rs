use configuration::LogSettings;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber: console output plus a daily rolling file
/// under `settings.directory`. `RUST_LOG` wins over `settings.level`.
///
/// The returned guard flushes the file writer on drop and must live as long
/// as the process.
pub fn init(settings: &LogSettings) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(&settings.directory)?;

    let file_appender = rolling::daily(&settings.directory, "dashboard.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{level},tower_http={level},sqlx=warn",
            level = settings.level
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .try_init()?;

    Ok(guard)
}
