use serde_json::json;
use trendlens_core::{AnalysisConfig, AnalysisRequest, EntityId, TrendAnalyzer};

use crate::cli::{AnalyzeArgs, SeriesPairArgs};
use crate::config::read_series;
use crate::error::CliError;

use super::{entity_error, CommandResult};

#[tracing::instrument(skip_all, fields(entity = %args.series.entity))]
pub fn run(args: &AnalyzeArgs, config: &AnalysisConfig) -> Result<CommandResult, CliError> {
    let mut request = build_request(&args.series)?;
    if let Some(path) = &args.projected {
        request = request.with_projection(read_series(path)?);
    }

    let analyzer = TrendAnalyzer::new(with_window(config, &args.series));
    match analyzer.analyze(&request) {
        Ok(report) => {
            let mut result = CommandResult::ok(serde_json::to_value(&report)?);
            if report.correlation.long_term.is_none() {
                result = result.with_warning(format!(
                    "{}: long-term correlation unavailable",
                    report.entity
                ));
            }
            if report.correlation.short_term.is_none() {
                result = result.with_warning(format!(
                    "{}: short-term correlation unavailable over {}",
                    report.entity, report.correlation.short_window
                ));
            }
            Ok(result)
        }
        Err(error) => {
            let entity = request.entity.as_str();
            Ok(CommandResult::ok(json!({ "entity": entity }))
                .with_errors(vec![entity_error(entity, &error)]))
        }
    }
}

pub(super) fn build_request(args: &SeriesPairArgs) -> Result<AnalysisRequest, CliError> {
    let entity = EntityId::parse(&args.entity)?;
    Ok(AnalysisRequest::new(
        entity,
        read_series(&args.interest)?,
        read_series(&args.price)?,
        args.granularity,
        args.kind,
    ))
}

/// Apply a `--short-window` flag over the loaded config.
pub(super) fn with_window(config: &AnalysisConfig, args: &SeriesPairArgs) -> AnalysisConfig {
    let mut config = config.clone();
    if let Some(window) = args.short_window {
        config.short_window = window;
    }
    config
}
