use serde_json::{json, Value};
use trendlens_core::{
    sort_summaries, AnalysisConfig, AnalysisRequest, SortOrder, TrendAnalyzer, TrendReport,
};

use crate::cli::BatchArgs;
use crate::config::read_series;
use crate::error::CliError;

use super::{entity_error, CommandResult};

#[tracing::instrument(skip_all, fields(input = %args.input.display()))]
pub fn run(args: &BatchArgs, config: &AnalysisConfig) -> Result<CommandResult, CliError> {
    let order: SortOrder = args.sort.parse()?;
    let raw = read_series(&args.input)?;
    let requests: Vec<AnalysisRequest> = serde_json::from_str(&raw).map_err(|error| {
        CliError::Command(format!("invalid batch file {}: {error}", args.input.display()))
    })?;
    if requests.is_empty() {
        return Err(CliError::Command(String::from("batch file holds no requests")));
    }

    let results = TrendAnalyzer::new(config.clone()).analyze_many(&requests);

    let mut reports = Vec::with_capacity(results.len());
    let mut errors = Vec::new();
    for (request, result) in requests.iter().zip(results) {
        match result {
            Ok(report) => reports.push(report),
            Err(error) => errors.push(entity_error(request.entity.as_str(), &error)),
        }
    }

    let mut summaries: Vec<_> = reports.iter().map(|report| report.summary.clone()).collect();
    sort_summaries(&mut summaries, order);

    let rows: Vec<Value> = summaries
        .iter()
        .filter_map(|summary| {
            let report = reports.iter().find(|report| report.entity == summary.entity)?;
            Some(row(report))
        })
        .collect();
    tracing::debug!(
        analyzed = rows.len(),
        failed = errors.len(),
        order = %order,
        "batch ranked"
    );

    Ok(CommandResult::ok(json!({ "order": order.as_str(), "rows": rows })).with_errors(errors))
}

// Flat ranking row: the summary plus both correlations.
fn row(report: &TrendReport) -> Value {
    let summary = &report.summary;
    json!({
        "entity": summary.entity.as_str(),
        "latest_date": summary.latest_date,
        "magnitude": summary.magnitude,
        "growth": summary.growth_label,
        "long_term": report.correlation.long_term,
        "short_term": report.correlation.short_term,
    })
}
