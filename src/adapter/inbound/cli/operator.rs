//! Inbound operator accessor for CLI handlers.

use std::path::Path;
use std::sync::OnceLock;

use super::paths;
use crate::error::{ConfigError, Result};
use crate::port::inbound::operator::port::OperatorPort;

static OPERATOR: OnceLock<Box<dyn OperatorPort>> = OnceLock::new();

/// Installs the operator implementation used by CLI handlers.
pub fn install(operator: Box<dyn OperatorPort>) -> std::result::Result<(), Box<dyn OperatorPort>> {
    OPERATOR.set(operator)
}

/// Returns the configured operator capability surface for CLI handlers.
#[must_use]
pub fn operator() -> &'static dyn OperatorPort {
    OPERATOR
        .get()
        .expect("CLI operator not installed; call cli::operator::install from main")
        .as_ref()
}

/// Load config TOML from disk for operator-facing use-cases.
pub fn read_config_toml(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile(e).into())
}

/// Resolve the configuration content for a command.
///
/// An explicit path must exist. Without one, the default file is read when
/// present and defaults apply otherwise.
pub fn resolve_config_toml(explicit: Option<&Path>) -> Result<Option<String>> {
    if let Some(path) = explicit {
        return read_config_toml(path).map(Some);
    }

    let default = paths::default_config();
    if default.is_file() {
        return read_config_toml(&default).map(Some);
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::error::Error;

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = resolve_config_toml(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));
    }

    #[test]
    fn explicit_config_is_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[cluster]\nname = \"fred\"\n").unwrap();

        let content = resolve_config_toml(Some(&path)).unwrap();

        assert_eq!(content.as_deref(), Some("[cluster]\nname = \"fred\"\n"));
    }
}
