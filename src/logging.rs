use tracing::level_filters::LevelFilter;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::Config;

/// Warnings and errors go to stderr; the log file gets whatever
/// `config.log_filter` lets through, rotated daily.
///
/// Keep the returned guard alive until exit so buffered lines get flushed.
pub fn init(config: &Config) -> Option<WorkerGuard> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(LevelFilter::WARN);

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("hydrate-tracker")
        .filename_suffix("log")
        .build(&config.log_dir);

    match file_appender {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let filter = EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| EnvFilter::new("info"));
            let file = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter);

            tracing_subscriber::registry()
                .with(console)
                .with(file)
                .init();

            Some(guard)
        }
        Err(e) => {
            tracing_subscriber::registry().with(console).init();
            tracing::warn!("Unable to open log directory {:?}: {e}", config.log_dir);

            None
        }
    }
}
