//! Price observation model

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single sampled price at a point in time
///
/// Values are produced by a price provider and never modified afterwards,
/// so the fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceData {
    timestamp: DateTime<Utc>,
    price: f64,
}

impl PriceData {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        PriceData { timestamp, price }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}

/// Output of the binary when a JSON report is requested
#[derive(Debug, Serialize)]
pub struct PriceIncreaseReport {
    pub price_increase: f64,
}
