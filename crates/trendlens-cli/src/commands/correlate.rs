use serde_json::json;
use trendlens_core::{
    align, codec, correlate, resample, AlignedPair, AnalysisConfig, CoreError, Granularity,
    SourceKind,
};

use crate::cli::CorrelateArgs;
use crate::error::CliError;

use super::analyze::{build_request, with_window};
use super::{entity_error, CommandResult};

#[tracing::instrument(skip_all, fields(entity = %args.series.entity))]
pub fn run(args: &CorrelateArgs, config: &AnalysisConfig) -> Result<CommandResult, CliError> {
    let request = build_request(&args.series)?;
    let config = with_window(config, &args.series);

    let aligned = align_request(
        &request.interest_raw,
        &request.price_raw,
        args.series.granularity,
        args.series.kind,
        &config,
    );
    let aligned = match aligned {
        Ok(aligned) => aligned,
        Err(error) => {
            let entity = request.entity.as_str();
            return Ok(CommandResult::ok(json!({ "entity": entity }))
                .with_errors(vec![entity_error(entity, &error)]));
        }
    };

    let result = correlate(&request.entity, &aligned, config.short_window);
    let undefined = result.long_term.is_none();
    let mut command = CommandResult::ok(json!({
        "correlation": result,
        "aligned_points": aligned.len(),
    }));
    if undefined {
        command = command.with_warning(format!(
            "{}: long-term correlation unavailable",
            request.entity
        ));
    }
    Ok(command)
}

fn align_request(
    interest_raw: &str,
    price_raw: &str,
    granularity: Granularity,
    kind: SourceKind,
    config: &AnalysisConfig,
) -> Result<AlignedPair, CoreError> {
    let interest = codec::parse(interest_raw, granularity, kind)?;
    let interest = codec::normalize_to_period_end(&interest, granularity)?;
    let mut price = codec::parse(price_raw, Granularity::Daily, SourceKind::Price)?;
    if let Some(aggregation) = config.resample_price {
        price = resample(&price, granularity, aggregation)?;
    }
    align(&price, &interest, config.align_direction)
}

#[cfg(test)]
mod tests {
    use trendlens_core::Window;

    use super::*;
    use crate::cli::SeriesPairArgs;
    use crate::commands::fixtures;

    fn args(interest: &std::path::Path, price: &std::path::Path) -> CorrelateArgs {
        CorrelateArgs {
            series: SeriesPairArgs {
                entity: String::from("NVDA"),
                interest: interest.to_path_buf(),
                price: price.to_path_buf(),
                granularity: Granularity::Monthly,
                kind: SourceKind::SearchVolume,
                short_window: Some(Window::Months(3)),
            },
        }
    }

    #[test]
    fn correlates_aligned_pairs() {
        let interest = fixtures::file(fixtures::INTEREST);
        let price = fixtures::file(&fixtures::prices());

        let result = run(&args(interest.path(), price.path()), &AnalysisConfig::default())
            .expect("correlation");
        assert!(result.errors.is_empty());
        assert_eq!(result.data["aligned_points"], 6);
        let long_term = result.data["correlation"]["long_term"]
            .as_f64()
            .expect("long term");
        assert!((-1.0..=1.0).contains(&long_term));
    }

    #[test]
    fn unreadable_price_series_is_reported_per_entity() {
        let interest = fixtures::file(fixtures::INTEREST);
        let price = fixtures::file("");

        let result = run(&args(interest.path(), price.path()), &AnalysisConfig::default())
            .expect("command");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].entity.as_deref(), Some("NVDA"));
    }
}
