//! Data models shared by the price provider, the calculator and the binary

pub mod price;

pub use price::{PriceData, PriceIncreaseReport};
