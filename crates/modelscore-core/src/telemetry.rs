//! Centralised tracing initialisation for modelscore binaries.
//!
//! Call [`init_tracing`] once at program start to configure the global
//! subscriber. Subsequent calls are silently ignored (the global
//! subscriber can only be set once per process).

use std::fs::File;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Numeric log verbosity: `0` silent, `1` informational, `2` debug.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    #[default]
    Silent,
    Info,
    Debug,
}

impl Verbosity {
    /// Levels above 2 are treated as debug.
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => Verbosity::Silent,
            1 => Verbosity::Info,
            _ => Verbosity::Debug,
        }
    }

    pub fn directive(self) -> &'static str {
        match self {
            Verbosity::Silent => "off",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
        }
    }
}

/// Initialise the global tracing subscriber.
///
/// * `json` emits newline-delimited JSON log lines.
/// * `verbosity` is the default filter when `RUST_LOG` is not set.
/// * `log_file`, when given, receives all log lines (appended, no ANSI
///   colours); otherwise logs go to stderr so stdout stays reserved for
///   output records.
pub fn init_tracing(json: bool, verbosity: Verbosity, log_file: Option<File>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let ansi = log_file.is_none();
    let writer = match log_file {
        Some(file) => BoxMakeWriter::new(Mutex::new(file)),
        None => BoxMakeWriter::new(std::io::stderr),
    };

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(writer).with_ansi(false).json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(writer).with_ansi(ansi))
            .try_init()
            .ok();
    }
}
