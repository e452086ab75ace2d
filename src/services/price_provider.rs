use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use sqlx::postgres::PgPool;
use tracing::debug;

use crate::db;
use crate::models::PriceData;
use crate::utils::RetrievalError;

/// Source of price observations
///
/// Implementations must return `list` results newest first; callers rely on
/// that ordering and never sort.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// The most recent observation across all days
    async fn latest(&self) -> Result<PriceData, RetrievalError>;

    /// Every observation recorded on the local calendar day `date`, newest first.
    /// Empty when there are none.
    async fn list(&self, date: NaiveDate) -> Result<Vec<PriceData>, RetrievalError>;
}

/// Price provider backed by the `stockprices` table
#[derive(Clone)]
pub struct PgPriceProvider {
    pool: PgPool,
}

impl PgPriceProvider {
    pub fn new(pool: PgPool) -> Self {
        PgPriceProvider { pool }
    }
}

#[async_trait]
impl PriceProvider for PgPriceProvider {
    async fn latest(&self) -> Result<PriceData, RetrievalError> {
        let row = db::stockprices::get_latest_price(&self.pool)
            .await
            .map_err(RetrievalError::query("unable to query table"))?
            .ok_or(RetrievalError::NoRows)?;

        db::stockprices::parse_price_row(row).map_err(RetrievalError::Decode)
    }

    async fn list(&self, date: NaiveDate) -> Result<Vec<PriceData>, RetrievalError> {
        let (start, end) = db::stockprices::day_bounds(date, &Local)
            .ok_or_else(|| RetrievalError::other(format!("no local midnight for {}", date)))?;

        let rows = db::stockprices::get_prices_in_range(&self.pool, start, end)
            .await
            .map_err(RetrievalError::query("unable to prepare SELECT statement"))?;

        debug!("Fetched {} price observations for {}", rows.len(), date);

        rows.into_iter()
            .map(|row| db::stockprices::parse_price_row(row).map_err(RetrievalError::Decode))
            .collect()
    }
}
