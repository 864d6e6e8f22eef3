//! Miette-based error diagnostics for CLI error presentation.
//!
//! Configuration parse failures are rendered with the offending TOML
//! snippet and a label on the failing span.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::error::{ConfigError, Error};

/// Configuration error with source location context.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(clusterator::config))]
pub struct ConfigDiagnostic {
    /// Human-readable error message.
    pub message: String,

    /// Configuration file content.
    #[source_code]
    pub src: String,

    /// Byte offset and length of the problematic region.
    #[label("here")]
    pub span: SourceSpan,

    /// Optional help text with suggestions for fixing the error.
    #[help]
    pub help: Option<String>,
}

impl ConfigDiagnostic {
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        src: impl Into<String>,
        offset: usize,
        len: usize,
    ) -> Self {
        Self {
            message: message.into(),
            src: src.into(),
            span: (offset, len).into(),
            help: None,
        }
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Diagnostic for a TOML parse error in `src`, when it carries a span.
    #[must_use]
    pub fn from_error(error: &Error, src: &str) -> Option<Self> {
        let Error::Config(ConfigError::Parse(parse)) = error else {
            return None;
        };
        let span = parse.span()?;

        Some(
            Self::new(
                format!("invalid configuration: {}", parse.message().trim()),
                src,
                span.start,
                span.end.saturating_sub(span.start),
            )
            .with_help("see `clusterator --help` for the configuration file location"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::settings::Config;

    #[test]
    fn parse_errors_point_into_the_source() {
        let src = "[ports]\nengine = \"not a port\"\n";
        let error = Config::parse_toml(src).unwrap_err();

        let diagnostic = ConfigDiagnostic::from_error(&error, src).unwrap();

        let offset = diagnostic.span.offset();
        assert!(offset >= "[ports]\n".len());
        assert!(offset < src.len());
    }

    #[test]
    fn other_errors_have_no_diagnostic() {
        assert!(ConfigDiagnostic::from_error(&Error::NoHosts, "").is_none());
    }
}
