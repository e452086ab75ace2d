use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use sqlx::postgres::PgPool;

use crate::models::PriceData;

/// Number of rows written by `seed_prices`
pub const SEED_ROWS: i64 = 5;

/// Get the most recent price observation across all days
/// Returns: (timestamp, price as text) so DECIMAL survives without precision loss
pub async fn get_latest_price(
    pool: &PgPool,
) -> Result<Option<(DateTime<Utc>, String)>, sqlx::Error> {
    sqlx::query_as::<_, (DateTime<Utc>, String)>(
        "SELECT timestamp, CAST(price AS TEXT) AS price_str FROM stockprices ORDER BY timestamp DESC LIMIT 1"
    )
    .fetch_optional(pool)
    .await
}

/// Get all price observations in `[start, end)`, newest first
///
/// Bounds are absolute instants, so the session time zone (UTC under sqlx)
/// plays no part in which rows match.
pub async fn get_prices_in_range(
    pool: &PgPool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<(DateTime<Utc>, String)>, sqlx::Error> {
    sqlx::query_as::<_, (DateTime<Utc>, String)>(
        "SELECT timestamp, CAST(price AS TEXT) AS price_str FROM stockprices WHERE timestamp >= $1 AND timestamp < $2 ORDER BY timestamp DESC"
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

/// First instant of `date` in `tz`, as UTC
/// Falls back to the first valid hour when midnight is skipped by a DST change
fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<DateTime<Utc>> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}

/// UTC bounds `[start, end)` of the calendar day `date` as observed in `tz`
pub fn day_bounds<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = start_of_day(date, tz)?;
    let end = start_of_day(date.succ_opt()?, tz)?;
    Some((start, end))
}

/// Add a single price observation
pub async fn add_price(pool: &PgPool, data: &PriceData) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO stockprices (timestamp, price) VALUES ($1, CAST($2 AS DECIMAL))")
        .bind(data.timestamp())
        .bind(data.price())
        .execute(pool)
        .await?;

    Ok(())
}

/// Build the demo series: one row per minute before `now`, prices 25, 20, 15, 10, 5 newest first
pub fn seed_series(now: DateTime<Utc>) -> Vec<PriceData> {
    (1..=SEED_ROWS)
        .map(|i| PriceData::new(now - Duration::minutes(i), ((6 - i) * 5) as f64))
        .collect()
}

/// Insert the demo series
pub async fn seed_prices(pool: &PgPool, now: DateTime<Utc>) -> Result<usize, sqlx::Error> {
    let series = seed_series(now);
    for data in &series {
        add_price(pool, data).await?;
    }

    Ok(series.len())
}

/// Convert a (timestamp, price text) row into a price observation
pub fn parse_price_row(row: (DateTime<Utc>, String)) -> Result<PriceData, String> {
    let (timestamp, price_str) = row;
    let price = price_str
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("'{}' at {}: {}", price_str, timestamp, e))?;

    Ok(PriceData::new(timestamp, price))
}
