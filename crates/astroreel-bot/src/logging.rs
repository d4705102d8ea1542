//! Tracing setup: stdout plus a daily-rolling log file.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing with a stdout layer and a daily-rolling file
/// layer. The returned guard must be held for the process lifetime so
/// buffered file output is flushed on shutdown.
pub fn init_tracing(log_dir: &Path, use_json: bool) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(log_dir, "astroreel.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("astroreel_bot=info".parse().unwrap())
        .add_directive("astroreel_content=info".parse().unwrap())
        .add_directive("astroreel_media=info".parse().unwrap())
        .add_directive("astroreel_publisher=info".parse().unwrap())
        .add_directive("astroreel_models=info".parse().unwrap())
        .add_directive("hyper=warn".parse().unwrap())
        .add_directive("reqwest=warn".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(fmt::layer().with_writer(file_writer).with_ansi(false))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(fmt::layer().with_writer(file_writer).with_ansi(false))
            .with(env_filter)
            .init();
    }

    guard
}
