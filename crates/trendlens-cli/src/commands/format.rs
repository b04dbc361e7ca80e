use serde_json::json;
use trendlens_core::{format_growth, format_magnitude};

use crate::cli::{FormatArgs, FormatCommand};
use crate::error::CliError;

use super::CommandResult;

pub fn run(args: &FormatArgs) -> Result<CommandResult, CliError> {
    let data = match &args.command {
        FormatCommand::Magnitude { value } => json!({
            "value": value,
            "text": format_magnitude(*value),
        }),
        FormatCommand::Growth { pct } => {
            let parsed = parse_growth(pct)?;
            let (text, category) = format_growth(parsed);
            json!({
                "percent": parsed,
                "text": text,
                "category": category,
                "colour": category.colour(),
            })
        }
    };
    Ok(CommandResult::ok(data))
}

// `none` stands for growth from a zero base.
fn parse_growth(input: &str) -> Result<Option<f64>, CliError> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    trimmed
        .trim_end_matches('%')
        .parse::<f64>()
        .ok()
        .filter(|pct| pct.is_finite())
        .map(Some)
        .ok_or_else(|| CliError::Command(format!("invalid growth percentage '{input}'")))
}
