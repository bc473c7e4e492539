// reeltag (video catalog builder and viewer)
// Copyright (C) 2025 Andrew Nissen

use chrono::Local;
use std::error::Error;
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// One file per run, named after the moment the run started.
pub fn log_file_name() -> String {
    format!("{}.log", Local::now().format("%Y-%m-%d-%H-%M-%S"))
}

/// Installs the global subscriber. `console` controls the stderr layer (the
/// TUI turns it off while it owns the terminal); `log_dir` adds a per-run
/// file. Keep the returned guard alive or buffered file lines are lost.
pub fn init_logging(
    console: bool,
    log_dir: Option<&Path>,
) -> Result<Option<WorkerGuard>, Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = console.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::never(dir, log_file_name());
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name_shape() {
        let name = log_file_name();
        assert!(name.ends_with(".log"));
        // YYYY-mm-dd-HH-MM-SS
        assert_eq!(name.trim_end_matches(".log").split('-').count(), 6);
    }
}
