//! Forecast engine: short-term demand projection per product
//!
//! Fits an OLS trend over the full daily history of one product and projects
//! it forward. No windowing and no outlier rejection — a long history with a
//! regime change will drag the trend, which is a known limitation of the
//! single-estimator design.

mod regression;

pub use regression::{fit_line, mape, r_squared, TrendLine};

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use shoppulse_common::db::SalesRecord;
use shoppulse_common::{Error, Result};
use std::collections::BTreeMap;
use tracing::debug;

/// Hard floor on distinct historical days before a forecast is attempted
pub const MIN_HISTORY_DAYS: usize = 5;

/// Qualitative recommendation bands, classified by projected growth.
/// Evaluated top to bottom, first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    /// Growth above 20%: increase inventory orders to avoid stockouts
    SurgeAlert,
    /// Growth above 5%: maintain healthy stock levels and monitor
    SteadyGrowth,
    /// Growth above -5% (or undefined): standard restocking
    Stable,
    /// Projected drop: consider promotions or reduced orders
    Decline,
}

impl Recommendation {
    fn from_growth(growth: Option<f64>) -> Self {
        match growth {
            Some(g) if g > 20.0 => Recommendation::SurgeAlert,
            Some(g) if g > 5.0 => Recommendation::SteadyGrowth,
            Some(g) if g > -5.0 => Recommendation::Stable,
            Some(_) => Recommendation::Decline,
            // Undefined growth (no historical volume) stays neutral
            None => Recommendation::Stable,
        }
    }
}

/// One point of a daily quantity series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyQuantity {
    pub date: NaiveDate,
    pub quantity: f64,
}

/// Forecast output for one product. Recomputed on every request, never cached.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastResult {
    pub product: String,
    /// Observed daily quantities, ascending by date
    pub history: Vec<DailyQuantity>,
    /// Projected daily quantities for the requested horizon, all >= 0
    pub projection: Vec<DailyQuantity>,
    pub slope: f64,
    pub intercept: f64,
    /// In-sample coefficient of determination
    pub r_squared: f64,
    /// `max(0, (1 - MAPE) * 100)`, bounded to [0, 100]
    pub confidence_pct: f64,
    /// Projected mean vs. historical mean, in percent. `None` when the
    /// historical mean is 0 (growth is undefined, not infinite).
    pub growth_pct: Option<f64>,
    pub recommendation: Recommendation,
    /// Sum of the projection; a stocking suggestion for the horizon
    pub projected_total: f64,
}

/// Forecast `horizon_days` of demand for `product` from ledger records.
///
/// Same-day duplicate rows are summed before fitting. Fails with
/// `Error::InsufficientData` below the 5-distinct-day floor, which the caller
/// should surface as guidance rather than a crash.
pub fn forecast(
    records: &[SalesRecord],
    product: &str,
    horizon_days: u32,
) -> Result<ForecastResult> {
    if horizon_days == 0 {
        return Err(Error::InvalidInput(
            "Forecast horizon must be at least 1 day".to_string(),
        ));
    }

    // Aggregate quantity per calendar day; BTreeMap keeps dates ascending
    let mut by_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for record in records.iter().filter(|r| r.product_name == product) {
        *by_day.entry(record.date).or_insert(0) += record.quantity;
    }

    if by_day.len() < MIN_HISTORY_DAYS {
        return Err(Error::InsufficientData {
            product: product.to_string(),
            days: by_day.len(),
            min_days: MIN_HISTORY_DAYS,
        });
    }

    let history: Vec<DailyQuantity> = by_day
        .iter()
        .map(|(date, qty)| DailyQuantity {
            date: *date,
            quantity: *qty as f64,
        })
        .collect();

    // Linear time axis: proleptic Gregorian day ordinals
    let xs: Vec<f64> = history
        .iter()
        .map(|p| p.date.num_days_from_ce() as f64)
        .collect();
    let ys: Vec<f64> = history.iter().map(|p| p.quantity).collect();

    let line = fit_line(&xs, &ys);
    let fitted: Vec<f64> = xs.iter().map(|x| line.predict(*x)).collect();
    let r_squared = r_squared(&ys, &fitted);
    let confidence_pct = ((1.0 - mape(&ys, &fitted)) * 100.0).max(0.0);

    // Project consecutive days starting the day after the last observation,
    // clipped at 0 because quantities cannot be negative. History is
    // non-empty past the floor check.
    let last_date = history[history.len() - 1].date;
    let mut projection = Vec::with_capacity(horizon_days as usize);
    for offset in 1..=u64::from(horizon_days) {
        let date = last_date
            .checked_add_days(Days::new(offset))
            .ok_or_else(|| Error::InvalidInput("Forecast horizon overflows the calendar".to_string()))?;
        let value = line.predict(date.num_days_from_ce() as f64).max(0.0);
        projection.push(DailyQuantity {
            date,
            quantity: value,
        });
    }

    let historical_mean = ys.iter().sum::<f64>() / ys.len() as f64;
    let projected_total: f64 = projection.iter().map(|p| p.quantity).sum();
    let projected_mean = projected_total / projection.len() as f64;

    let growth_pct = if historical_mean == 0.0 {
        None
    } else {
        Some((projected_mean - historical_mean) / historical_mean * 100.0)
    };
    let recommendation = Recommendation::from_growth(growth_pct);

    debug!(
        product,
        slope = line.slope,
        r_squared,
        ?growth_pct,
        ?recommendation,
        "Fitted demand trend"
    );

    Ok(ForecastResult {
        product: product.to_string(),
        history,
        projection,
        slope: line.slope,
        intercept: line.intercept,
        r_squared,
        confidence_pct,
        growth_pct,
        recommendation,
        projected_total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, product: &str, quantity: i64) -> SalesRecord {
        SalesRecord {
            id: 0,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            product_name: product.to_string(),
            quantity,
            revenue: 0.0,
        }
    }

    #[test]
    fn banding_thresholds_first_match_wins() {
        assert_eq!(
            Recommendation::from_growth(Some(25.0)),
            Recommendation::SurgeAlert
        );
        assert_eq!(
            Recommendation::from_growth(Some(20.0)),
            Recommendation::SteadyGrowth
        );
        assert_eq!(
            Recommendation::from_growth(Some(5.0)),
            Recommendation::Stable
        );
        assert_eq!(
            Recommendation::from_growth(Some(-5.0)),
            Recommendation::Decline
        );
        assert_eq!(Recommendation::from_growth(None), Recommendation::Stable);
    }

    #[test]
    fn same_day_duplicates_are_summed() {
        let records = vec![
            record("2024-01-01", "Milk", 5),
            record("2024-01-01", "Milk", 3),
            record("2024-01-02", "Milk", 8),
            record("2024-01-03", "Milk", 8),
            record("2024-01-04", "Milk", 8),
            record("2024-01-05", "Milk", 8),
        ];
        let result = forecast(&records, "Milk", 3).unwrap();
        assert_eq!(result.history.len(), 5);
        assert_eq!(result.history[0].quantity, 8.0);
    }

    #[test]
    fn other_products_do_not_leak_into_the_series() {
        let mut records = Vec::new();
        for day in 1..=5 {
            records.push(record(&format!("2024-01-0{day}"), "Milk", 10));
            records.push(record(&format!("2024-01-0{day}"), "Bread", 99));
        }
        let result = forecast(&records, "Milk", 2).unwrap();
        assert!(result.history.iter().all(|p| p.quantity == 10.0));
    }

    #[test]
    fn zero_volume_history_reports_neutral_recommendation() {
        let records: Vec<SalesRecord> = (1..=5)
            .map(|day| record(&format!("2024-01-0{day}"), "Milk", 0))
            .collect();
        let result = forecast(&records, "Milk", 7).unwrap();
        assert_eq!(result.growth_pct, None);
        assert_eq!(result.recommendation, Recommendation::Stable);
        assert_eq!(result.confidence_pct, 0.0);
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let records: Vec<SalesRecord> = (1..=5)
            .map(|day| record(&format!("2024-01-0{day}"), "Milk", 5))
            .collect();
        assert!(matches!(
            forecast(&records, "Milk", 0),
            Err(Error::InvalidInput(_))
        ));
    }
}
