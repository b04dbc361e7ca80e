use serde_json::json;
use trendlens_core::{codec, decompose_with, AnalysisConfig, CoreError, Decomposition};

use crate::cli::DecomposeArgs;
use crate::config::read_series;
use crate::error::CliError;

use super::{entity_error, CommandResult};

#[tracing::instrument(skip_all, fields(input = %args.input.display()))]
pub fn run(args: &DecomposeArgs, config: &AnalysisConfig) -> Result<CommandResult, CliError> {
    let raw = read_series(&args.input)?;
    let period = args.period.unwrap_or_else(|| config.period_for(args.granularity));

    match decompose_raw(&raw, args, period, config) {
        Ok(decomposition) => {
            let decomposition = if args.exact {
                decomposition
            } else {
                decomposition.rounded()
            };
            Ok(CommandResult::ok(json!({
                "period": decomposition.period(),
                "rows": decomposition.rows(),
            })))
        }
        Err(error) => {
            let source = args.input.display().to_string();
            Ok(CommandResult::ok(json!({ "period": period }))
                .with_errors(vec![entity_error(&source, &error)]))
        }
    }
}

fn decompose_raw(
    raw: &str,
    args: &DecomposeArgs,
    period: usize,
    config: &AnalysisConfig,
) -> Result<Decomposition, CoreError> {
    let series = codec::parse(raw, args.granularity, args.kind)?;
    let series = codec::normalize_to_period_end(&series, args.granularity)?;
    decompose_with(&series, period, &config.stl)
}
