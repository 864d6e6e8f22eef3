//! Logging configuration and initialization.

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    /// Same configuration with the level replaced.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Apply the CLI's `-q` and `-v` flags: `-q` gives `warn`, `-v` gives
    /// `debug` and `-vv` or more gives `trace`. Without flags the
    /// configured level stays.
    #[must_use]
    pub fn with_cli_flags(self, quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => self.with_level("warn"),
            (false, 0) => self,
            (false, 1) => self.with_level("debug"),
            (false, _) => self.with_level("trace"),
        }
    }

    /// Initialize the tracing subscriber with this logging configuration.
    ///
    /// `RUST_LOG` takes precedence over the configured level. Output goes
    /// to stderr so command output on stdout stays parseable. Calling this
    /// twice is harmless; the second subscriber is ignored.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        let _ = match self.format.as_str() {
            "json" => fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init(),
            _ => fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init(),
        };
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}
