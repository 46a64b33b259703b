//! Tracing setup for the command-line tool

use std::env;
use std::io::{self, IsTerminal, Write};

use indicatif::ProgressBar;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "FILIZER_LOG";

/// Filter used when the environment does not provide one
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "filizer=debug,info"
    } else {
        "info"
    }
}

/// Stderr writer that clears the progress bar around each log line
#[derive(Debug, Clone)]
pub struct ProgressWriter {
    progress: ProgressBar,
}

impl ProgressWriter {
    pub fn new(progress: ProgressBar) -> Self {
        Self { progress }
    }
}

impl Write for ProgressWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.progress.suspend(|| io::stderr().write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

impl<'a> MakeWriter<'a> for ProgressWriter {
    type Writer = ProgressWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Install the global subscriber, logging to stderr around `progress`
pub fn init_logger(verbose: bool, progress: ProgressBar) {
    let filter = env::var(LOG_ENV).unwrap_or_else(|_| default_filter(verbose).to_string());
    let filter_layer = EnvFilter::new(filter);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(ProgressWriter::new(progress))
                .with_ansi(io::stderr().is_terminal())
                .with_target(false)
                .without_time()
                .compact(),
        )
        .with(filter_layer)
        .init();
}
