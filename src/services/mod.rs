pub mod price_increase_service;
pub mod price_provider;

pub use price_increase_service::{PriceIncreaseCalculator, PriceIncreaseService};
pub use price_provider::{PgPriceProvider, PriceProvider};
