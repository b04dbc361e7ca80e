mod analyze;
mod batch;
mod correlate;
mod decompose;
mod format;

use std::time::Instant;

use serde_json::Value;
use trendlens_core::{Envelope, EnvelopeError, SCHEMA_VERSION};

use crate::cli::{Cli, Command};
use crate::config;
use crate::error::CliError;
use crate::metadata::Metadata;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }
}

pub fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let started = Instant::now();
    let analysis = config::load(cli.config.as_deref())?;

    let command_result = match &cli.command {
        Command::Analyze(args) => analyze::run(args, &analysis)?,
        Command::Batch(args) => batch::run(args, &analysis)?,
        Command::Decompose(args) => decompose::run(args, &analysis)?,
        Command::Correlate(args) => correlate::run(args, &analysis)?,
        Command::Format(args) => format::run(args)?,
    };

    let CommandResult {
        data,
        warnings,
        errors,
    } = command_result;

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let mut metadata = Metadata::new(latency_ms);
    for warning in warnings {
        metadata.push_warning(warning);
    }
    tracing::debug!(
        request_id = %metadata.request_id,
        latency_ms,
        errors = errors.len(),
        "command finished"
    );

    let meta = metadata.into_envelope_meta(SCHEMA_VERSION)?;
    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}

/// Envelope error for a core failure attributed to one entity.
fn entity_error(entity: &str, error: &trendlens_core::CoreError) -> EnvelopeError {
    tracing::warn!(entity, code = error.code(), %error, "analysis failed");
    EnvelopeError::from(error).with_entity(entity)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::Write;

    use tempfile::NamedTempFile;

    pub const INTEREST: &str = "01/01/2024: 1000, 02/01/2024: 1100, 03/01/2024: 1050, \
                                04/01/2024: 1200, 05/01/2024: 1300, 06/01/2024: 1250";

    /// 30 prices six days apart starting 01/01/2024.
    pub fn prices() -> String {
        let start = trendlens_core::SeriesDate::parse("01/01/2024").expect("date");
        (0..30)
            .map(|i| format!("{}: {}", start.add_days(i * 6).format_mdy(), 100 + 3 * i))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, "{contents}").expect("write");
        file
    }
}
