//! Flat `{date, <value key>}` records consumed by chart renderers.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::{Granularity, Series, SeriesDate, SourceKind};

/// One x-axis position with any number of named values.
///
/// Serializes as a flat object, e.g. `{"date": "Jan 2024", "volume": 1000}`.
/// Whole numbers are written without a fractional part.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRecord {
    pub date: String,
    pub values: BTreeMap<String, f64>,
}

impl ChartRecord {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: f64) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }
}

impl Serialize for ChartRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry("date", &self.date)?;
        for (key, value) in &self.values {
            if value.fract() == 0.0 && value.abs() < 9.0e15 {
                map.serialize_entry(key, &(*value as i64))?;
            } else {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

/// Value key for a source, with the ` (estimated)` suffix for projections.
pub fn value_key(kind: SourceKind, estimated: bool) -> String {
    if estimated {
        format!("{} (estimated)", kind.value_key())
    } else {
        kind.value_key().to_owned()
    }
}

/// `Jan 2024` for monthly data, `week of MM/DD/YYYY` for weekly social
/// views, plain `MM/DD/YYYY` otherwise.
pub fn date_label(date: SeriesDate, granularity: Granularity, kind: SourceKind) -> String {
    match (granularity, kind) {
        (Granularity::Monthly, _) => date.format_month_label(),
        (Granularity::Weekly, SourceKind::SocialViews) => format!("week of {}", date.format_mdy()),
        _ => date.format_mdy(),
    }
}

pub fn chart_records(series: &Series) -> Vec<ChartRecord> {
    let key = value_key(series.kind(), false);
    series
        .points()
        .iter()
        .map(|point| {
            ChartRecord::new(date_label(point.date, series.granularity(), series.kind()))
                .with_value(key.clone(), point.value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;

    #[test]
    fn serializes_flat_records_with_whole_numbers() {
        let record = ChartRecord::new("Jan 2024")
            .with_value("volume", 1000.0)
            .with_value("volume (estimated)", 1000.5);
        let json = serde_json::to_string(&record).expect("serialize");
        assert_eq!(
            json,
            r#"{"date":"Jan 2024","volume":1000,"volume (estimated)":1000.5}"#
        );
    }

    #[test]
    fn labels_dates_by_cadence_and_source() {
        let date = SeriesDate::parse("08/31/2025").expect("date");
        assert_eq!(
            date_label(date, Granularity::Monthly, SourceKind::SearchVolume),
            "Aug 2025"
        );
        assert_eq!(
            date_label(date, Granularity::Weekly, SourceKind::SocialViews),
            "week of 08/31/2025"
        );
        assert_eq!(
            date_label(date, Granularity::Weekly, SourceKind::SearchVolume),
            "08/31/2025"
        );
    }

    #[test]
    fn builds_records_keyed_by_source() {
        let series = codec::parse(
            "01/31/2024: 1000, 02/29/2024: 1100",
            Granularity::Monthly,
            SourceKind::SocialViews,
        )
        .expect("series");
        let records = chart_records(&series);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].date, "Feb 2024");
        assert_eq!(records[1].get("views"), Some(1100.0));
        assert_eq!(value_key(SourceKind::Price, true), "price (estimated)");
    }
}
