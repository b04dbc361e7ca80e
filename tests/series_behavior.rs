//! Behavior-driven tests for parsing, normalizing and aligning series.

use trendlens_core::{
    align, codec, snap, AlignDirection, FormatError, Granularity, SeriesDate, SourceKind,
};
use trendlens_tests::{daily, price_text, MONTHLY_INTEREST};

// =============================================================================
// Codec
// =============================================================================

#[test]
fn when_well_formed_text_is_parsed_and_formatted_system_returns_the_same_text() {
    // Given: canonical series text
    let inputs = [
        MONTHLY_INTEREST.to_owned(),
        String::from("12/31/2023: 0"),
        price_text(5, 1),
    ];

    for text in inputs {
        // When: it goes through the codec and back
        let series = codec::parse(&text, Granularity::Daily, SourceKind::Price).expect("parse");
        let rendered = codec::format(&series);

        // Then: nothing but whitespace changed
        assert_eq!(
            rendered.split_whitespace().collect::<String>(),
            text.split_whitespace().collect::<String>()
        );
    }
}

#[test]
fn when_values_carry_thousands_separators_and_quotes_system_strips_them() {
    // Given: a quoted stored column with grouped digits
    let raw = "\"01/01/2024: 1,250,000, 02/01/2024: 980\"";

    // When: it is parsed
    let series = codec::parse(raw, Granularity::Monthly, SourceKind::SearchVolume).expect("parse");

    // Then: the grouped value is one number
    assert_eq!(series.values(), vec![1_250_000.0, 980.0]);
}

#[test]
fn when_dates_repeat_or_go_backwards_system_fails_the_parse() {
    // Given: out-of-order and duplicate dates
    for raw in [
        "02/01/2024: 10, 01/01/2024: 20",
        "01/01/2024: 10, 01/01/2024: 20",
    ] {
        // When / Then: the parse is rejected rather than coerced
        let error = codec::parse(raw, Granularity::Monthly, SourceKind::SearchVolume)
            .expect_err("not increasing");
        assert!(matches!(error, FormatError::DatesNotIncreasing { index: 1, .. }));
    }
}

// =============================================================================
// Normalization
// =============================================================================

#[test]
fn when_normalizing_twice_system_gives_the_same_series() {
    for granularity in [Granularity::Daily, Granularity::Weekly, Granularity::Monthly] {
        // Given: observations dated at the start of each month
        let series = codec::parse(MONTHLY_INTEREST, granularity, SourceKind::SearchVolume)
            .expect("parse");

        // When: normalization is applied once and twice
        let once = codec::normalize_to_period_end(&series, granularity).expect("once");
        let twice = codec::normalize_to_period_end(&once, granularity).expect("twice");

        // Then: the second pass changes nothing
        assert_eq!(once, twice);
    }
}

#[test]
fn when_two_observations_share_a_month_system_rejects_normalization() {
    // Given: two dates in January
    let series = codec::parse(
        "01/01/2024: 10, 01/15/2024: 20",
        Granularity::Monthly,
        SourceKind::SearchVolume,
    )
    .expect("parse");

    // When / Then: collapsing them onto 01/31 is refused
    assert!(codec::normalize_to_period_end(&series, Granularity::Monthly).is_err());
}

// =============================================================================
// Alignment
// =============================================================================

#[test]
fn when_snapping_system_keeps_every_date_within_reference_bounds() {
    // Given: a reference calendar narrower than the source on both sides
    let reference = daily(
        SourceKind::Price,
        &[("01/10/2024", 1.0), ("01/20/2024", 2.0), ("01/30/2024", 3.0)],
    );
    let source = daily(
        SourceKind::SearchVolume,
        &[
            ("01/01/2024", 5.0),
            ("01/15/2024", 6.0),
            ("01/16/2024", 7.0),
            ("02/20/2024", 8.0),
        ],
    );

    // When: source is snapped onto the reference
    let snapped = snap(&source, &reference);

    // Then: every date is a reference date inside its range
    let first = reference.first().expect("first").date;
    let last = reference.last().expect("last").date;
    let dates: Vec<SeriesDate> = snapped.points().iter().map(|p| p.date).collect();
    for date in &dates {
        assert!(*date >= first && *date <= last);
    }
    // And: the exact tie on 01/15 goes to the earlier reference date
    assert_eq!(dates[1], SeriesDate::parse("01/10/2024").expect("date"));
    assert_eq!(dates[2], SeriesDate::parse("01/20/2024").expect("date"));
    assert_eq!(dates[3], last);
}

#[test]
fn when_series_never_overlap_after_price_snapping_system_still_pairs_by_clamping() {
    // Given: prices entirely after the interest observations
    let price = daily(SourceKind::Price, &[("03/01/2024", 10.0), ("03/02/2024", 11.0)]);
    let interest = daily(SourceKind::SearchVolume, &[("01/01/2024", 1.0), ("01/02/2024", 2.0)]);

    // When: interest is snapped onto the price calendar
    let aligned = align(&price, &interest, AlignDirection::InterestOntoPrice).expect("pairs");

    // Then: both interest points clamp to the first trading day
    assert_eq!(aligned.len(), 2);
    assert_eq!(aligned.left_values(), vec![10.0, 10.0]);
    assert_eq!(aligned.right_values(), vec![1.0, 2.0]);
}
