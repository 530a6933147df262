//! Batch normalization: raw CSV rows to `NewSalesRecord`s
//!
//! Dates are reformatted to canonical `YYYY-MM-DD` days; quantities must be
//! non-negative integers (a float-formatted whole number is accepted, since
//! spreadsheet exports often render `5` as `5.0`). Any cell that cannot be
//! interpreted fails the whole batch with `Error::Parse` naming the row.

use super::columns::{resolve_columns, RevenueSource};
use chrono::NaiveDate;
use shoppulse_common::db::NewSalesRecord;
use shoppulse_common::{Error, Result};

/// Date formats accepted from uploaded files, tried in order
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse one uploaded file into a normalized batch.
///
/// The file must be CSV with a header row containing at least `date`,
/// `product` and `quantity` (case-insensitive). Returns the rows in file
/// order; nothing touches the store here.
pub fn build_batch(data: &[u8]) -> Result<Vec<NewSalesRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| Error::InvalidInput(format!("Unreadable file header: {}", e)))?
        .clone();
    let map = resolve_columns(&headers)?;

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        // Header is line 1, so the first data record is row 2
        let row_no = idx + 2;
        let record =
            record.map_err(|e| Error::InvalidInput(format!("Row {}: {}", row_no, e)))?;

        let date = parse_date(cell(&record, map.date), row_no)?;
        let product_name = cell(&record, map.product).to_string();
        if product_name.is_empty() {
            return Err(Error::Parse {
                row: row_no,
                column: "product".to_string(),
                value: String::new(),
            });
        }
        let quantity = parse_quantity(cell(&record, map.quantity), row_no)?;

        let revenue = match map.revenue_source {
            RevenueSource::Price(col) => {
                quantity as f64 * parse_money(cell(&record, col), row_no, "price")?
            }
            RevenueSource::Revenue(col) => parse_money(cell(&record, col), row_no, "revenue")?,
            RevenueSource::Zero => 0.0,
        };

        rows.push(NewSalesRecord {
            date,
            product_name,
            quantity,
            revenue,
        });
    }

    Ok(rows)
}

fn cell<'a>(record: &'a csv::StringRecord, idx: usize) -> &'a str {
    record.get(idx).unwrap_or("").trim()
}

fn parse_date(value: &str, row: usize) -> Result<NaiveDate> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }
    // RFC 3339 timestamps lose their time-of-day component
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Ok(dt.date_naive());
    }
    Err(Error::Parse {
        row,
        column: "date".to_string(),
        value: value.to_string(),
    })
}

fn parse_quantity(value: &str, row: usize) -> Result<i64> {
    let parse_err = || Error::Parse {
        row,
        column: "quantity".to_string(),
        value: value.to_string(),
    };

    let quantity = if let Ok(n) = value.parse::<i64>() {
        n
    } else {
        let f = value.parse::<f64>().map_err(|_| parse_err())?;
        if !f.is_finite() || f.fract() != 0.0 {
            return Err(parse_err());
        }
        f as i64
    };

    if quantity < 0 {
        return Err(parse_err());
    }
    Ok(quantity)
}

/// Price/revenue cell: blank means 0, anything else must be a non-negative
/// number. Never silently coerced.
fn parse_money(value: &str, row: usize, column: &str) -> Result<f64> {
    if value.is_empty() {
        return Ok(0.0);
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 => Ok(f),
        _ => Err(Error::Parse {
            row,
            column: column.to_string(),
            value: value.to_string(),
        }),
    }
}
