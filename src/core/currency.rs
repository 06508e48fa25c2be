//! Currency conversion abstractions

use crate::core::error::FetchError;
use async_trait::async_trait;

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    /// Returns the multiplier converting one unit of `from` into `to`.
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64, FetchError>;
}
