use std::fs;
use std::path::Path;

use trendlens_core::AnalysisConfig;

use crate::error::CliError;

/// Load analysis settings from a JSON file, or defaults when no file is given.
pub fn load(path: Option<&Path>) -> Result<AnalysisConfig, CliError> {
    let Some(path) = path else {
        return Ok(AnalysisConfig::default());
    };

    let raw = fs::read_to_string(path).map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    let config: AnalysisConfig = serde_json::from_str(&raw).map_err(|error| CliError::Config {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;
    tracing::debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}

/// Read a series file into a string.
pub fn read_series(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use trendlens_core::Window;

    use super::*;

    #[test]
    fn missing_path_gives_defaults() {
        let config = load(None).expect("defaults");
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn reads_partial_json() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"short_window": "30d", "period": 4}}"#).expect("write");

        let config = load(Some(file.path())).expect("config");
        assert_eq!(config.short_window, Window::Days(30));
        assert_eq!(config.period, Some(4));
    }

    #[test]
    fn rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"short_window": "fortnight"}}"#).expect("write");

        let err = load(Some(file.path())).expect_err("bad window");
        assert!(matches!(err, CliError::Config { .. }));
        assert_eq!(err.exit_code(), 2);
    }
}
