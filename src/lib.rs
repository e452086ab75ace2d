//! Percentage change between the two most recent stock prices recorded today.
//!
//! `services::PriceIncreaseService` computes the metric from any
//! `services::PriceProvider`; `services::PgPriceProvider` reads the
//! `stockprices` Postgres table.

pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod utils;
