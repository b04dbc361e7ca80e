//! Compact text codec for series: `"MM/DD/YYYY: value, MM/DD/YYYY: value"`.
//!
//! Values may carry thousands separators (`1,250,000`). Because the comma is
//! also the token separator, a comma piece made of exactly three digits with
//! no leading whitespace is glued back onto the previous token's value.

use crate::{
    FormatError, Granularity, Series, SeriesDate, SourceKind, TimePoint, ValidationError,
};

/// Parse series text into a validated [`Series`].
///
/// Duplicate or out-of-order dates are rejected rather than coerced.
pub fn parse(raw: &str, granularity: Granularity, kind: SourceKind) -> Result<Series, FormatError> {
    let tokens = tokenize(raw);
    if tokens.is_empty() {
        return Err(FormatError::EmptyInput);
    }

    let mut points: Vec<TimePoint> = Vec::with_capacity(tokens.len());
    for (index, token) in tokens.iter().enumerate() {
        let (date, value) = split_token(index, token)?;
        let date = SeriesDate::parse(date)?;
        let value = parse_number(value)?;

        if let Some(previous) = points.last() {
            if previous.date >= date {
                return Err(FormatError::DatesNotIncreasing {
                    index,
                    previous: previous.date.format_mdy(),
                    current: date.format_mdy(),
                });
            }
        }
        points.push(TimePoint::new(date, value));
    }

    Ok(Series::from_validated(granularity, kind, points))
}

/// Render a series back into its compact text form.
pub fn format(series: &Series) -> String {
    series
        .points()
        .iter()
        .map(|point| format!("{}: {}", point.date.format_mdy(), point.value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Move every date to the end of its period: the last day of the month for
/// monthly data, the following Sunday for weekly data. Daily data is
/// returned unchanged (but retagged).
///
/// Fails when two observations fall into the same period, or when a
/// period end lies past the supported calendar.
pub fn normalize_to_period_end(
    series: &Series,
    granularity: Granularity,
) -> Result<Series, ValidationError> {
    let points = series
        .points()
        .iter()
        .map(|point| Ok(TimePoint::new(point.date.period_end(granularity)?, point.value)))
        .collect::<Result<Vec<_>, ValidationError>>()?;
    Series::new(granularity, series.kind(), points)
}

/// Extract just the values, in order, without validating dates.
///
/// Used for sparklines where only the shape of the series matters.
pub fn parse_values(raw: &str) -> Result<Vec<f64>, FormatError> {
    tokenize(raw)
        .iter()
        .enumerate()
        .map(|(index, token)| split_token(index, token).and_then(|(_, value)| parse_number(value)))
        .collect()
}

/// Date of the first token.
pub fn first_date(raw: &str) -> Result<SeriesDate, FormatError> {
    let tokens = tokenize(raw);
    let token = tokens.first().ok_or(FormatError::EmptyInput)?;
    let (date, _) = split_token(0, token)?;
    SeriesDate::parse(date)
}

/// Date of the last token.
pub fn last_date(raw: &str) -> Result<SeriesDate, FormatError> {
    let tokens = tokenize(raw);
    let index = tokens.len().checked_sub(1).ok_or(FormatError::EmptyInput)?;
    let (date, _) = split_token(index, &tokens[index])?;
    SeriesDate::parse(date)
}

/// Earliest and latest date across several series, or `None` when all are
/// empty.
pub fn date_span(series: &[Series]) -> Option<(SeriesDate, SeriesDate)> {
    let firsts = series.iter().filter_map(|s| s.first().map(|p| p.date));
    let lasts = series.iter().filter_map(|s| s.last().map(|p| p.date));
    Some((firsts.min()?, lasts.max()?))
}

fn tokenize(raw: &str) -> Vec<String> {
    let body = strip_wrapping(raw);
    let mut tokens: Vec<String> = Vec::new();

    for piece in body.split(',') {
        if is_thousands_group(piece) {
            if let Some(last) = tokens.last_mut() {
                if last.contains(':') && last.ends_with(|ch: char| ch.is_ascii_digit()) {
                    last.push_str(piece);
                    continue;
                }
            }
        }

        let piece = piece.trim();
        if !piece.is_empty() {
            tokens.push(piece.to_owned());
        }
    }

    tokens
}

fn strip_wrapping(raw: &str) -> &str {
    let trimmed = raw.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.trim();
        }
    }
    trimmed
}

// `000`, `250` or `500.75`: continuation of a separated integer part.
fn is_thousands_group(piece: &str) -> bool {
    let (digits, fraction) = match piece.split_once('.') {
        Some((digits, fraction)) => (digits, Some(fraction)),
        None => (piece, None),
    };
    digits.len() == 3
        && digits.bytes().all(|b| b.is_ascii_digit())
        && fraction.map_or(true, |f| !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()))
}

fn split_token(index: usize, token: &str) -> Result<(&str, &str), FormatError> {
    let malformed = || FormatError::MalformedToken {
        index,
        token: token.to_owned(),
    };

    let (date, value) = token.split_once(':').ok_or_else(malformed)?;
    let (date, value) = (date.trim(), value.trim());
    if date.is_empty() || value.is_empty() || value.contains(':') {
        return Err(malformed());
    }
    Ok((date, value))
}

fn parse_number(value: &str) -> Result<f64, FormatError> {
    let invalid = || FormatError::InvalidValue {
        value: value.to_owned(),
    };

    let unsigned = value
        .strip_prefix(|ch: char| ch == '+' || ch == '-')
        .unwrap_or(value);
    let (int_part, fraction) = match unsigned.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (unsigned, None),
    };
    let digits_only = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits_only(int_part) || !fraction.map_or(true, digits_only) {
        return Err(invalid());
    }

    let parsed: f64 = value.parse().map_err(|_| invalid())?;
    if !parsed.is_finite() {
        return Err(invalid());
    }
    Ok(parsed)
}
