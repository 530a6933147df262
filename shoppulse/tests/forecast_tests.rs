//! Forecast engine tests against the documented properties:
//! the 5-day floor, non-negative projections, growth banding and the
//! 10-day rising-series scenario.

use chrono::NaiveDate;
use shoppulse::{forecast, Recommendation};
use shoppulse_common::db::SalesRecord;
use shoppulse_common::Error;

fn series(product: &str, start: &str, quantities: &[i64]) -> Vec<SalesRecord> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    quantities
        .iter()
        .enumerate()
        .map(|(i, q)| SalesRecord {
            id: i as i64 + 1,
            date: start + chrono::Days::new(i as u64),
            product_name: product.to_string(),
            quantity: *q,
            revenue: 0.0,
        })
        .collect()
}

#[test]
fn four_distinct_days_is_below_the_floor() {
    let records = series("Widget", "2024-01-01", &[5, 6, 7, 8]);
    let err = forecast(&records, "Widget", 7).unwrap_err();
    match err {
        Error::InsufficientData { days, min_days, .. } => {
            assert_eq!(days, 4);
            assert_eq!(min_days, 5);
        }
        other => panic!("expected InsufficientData, got {other:?}"),
    }
}

#[test]
fn five_distinct_days_is_enough() {
    let records = series("Widget", "2024-01-01", &[5, 6, 7, 8, 9]);
    assert!(forecast(&records, "Widget", 7).is_ok());
}

#[test]
fn duplicate_days_do_not_count_toward_the_floor() {
    // 8 rows but only 4 distinct days
    let mut records = series("Widget", "2024-01-01", &[5, 6, 7, 8]);
    records.extend(series("Widget", "2024-01-01", &[1, 1, 1, 1]));
    assert!(matches!(
        forecast(&records, "Widget", 7),
        Err(Error::InsufficientData { .. })
    ));
}

#[test]
fn unknown_product_is_insufficient_data() {
    let records = series("Widget", "2024-01-01", &[5, 6, 7, 8, 9]);
    assert!(matches!(
        forecast(&records, "Gadget", 7),
        Err(Error::InsufficientData { days: 0, .. })
    ));
}

#[test]
fn declining_trend_never_projects_below_zero() {
    let records = series("Widget", "2024-01-01", &[50, 40, 30, 20, 10, 5]);
    let result = forecast(&records, "Widget", 30).unwrap();

    assert!(result.slope < 0.0);
    assert_eq!(result.projection.len(), 30);
    assert!(result.projection.iter().all(|p| p.quantity >= 0.0));
    // Far enough out, a steep decline bottoms out at the floor
    assert_eq!(result.projection.last().unwrap().quantity, 0.0);
}

#[test]
fn strong_growth_lands_in_the_surge_band() {
    // Steep rise: projected mean well over 20% above historical mean
    let records = series("Widget", "2024-01-01", &[10, 30, 50, 70, 90]);
    let result = forecast(&records, "Widget", 7).unwrap();

    let growth = result.growth_pct.unwrap();
    assert!(growth > 20.0, "growth was {growth}");
    assert_eq!(result.recommendation, Recommendation::SurgeAlert);
}

#[test]
fn flat_series_is_stable() {
    let records = series("Widget", "2024-01-01", &[10, 10, 10, 10, 10, 10]);
    let result = forecast(&records, "Widget", 7).unwrap();

    let growth = result.growth_pct.unwrap();
    assert!(growth.abs() < 1e-9);
    assert_eq!(result.recommendation, Recommendation::Stable);
    // Perfect fit on a flat series
    assert_eq!(result.r_squared, 1.0);
    assert!((result.confidence_pct - 100.0).abs() < 1e-9);
}

#[test]
fn steep_decline_lands_in_the_decline_band() {
    let records = series("Widget", "2024-01-01", &[100, 80, 60, 40, 20]);
    let result = forecast(&records, "Widget", 7).unwrap();
    assert_eq!(result.recommendation, Recommendation::Decline);
}

#[test]
fn ten_day_rising_scenario() {
    let records = series("Widget", "2024-01-01", &[5, 6, 5, 7, 8, 7, 9, 10, 9, 11]);
    let result = forecast(&records, "Widget", 7).unwrap();

    assert!(result.slope > 0.0);
    assert!(result.r_squared > 0.0);
    assert_eq!(result.projection.len(), 7);
    assert!(result.projection.iter().all(|p| p.quantity >= 0.0));

    // Projection starts the day after the last observation and is consecutive
    assert_eq!(
        result.projection[0].date,
        NaiveDate::parse_from_str("2024-01-11", "%Y-%m-%d").unwrap()
    );
    for pair in result.projection.windows(2) {
        assert_eq!(pair[1].date - pair[0].date, chrono::TimeDelta::days(1));
    }

    let total: f64 = result.projection.iter().map(|p| p.quantity).sum();
    assert!((result.projected_total - total).abs() < 1e-9);
}
