//! Asset pricing abstraction

use crate::core::error::FetchError;
use async_trait::async_trait;

#[async_trait]
pub trait AssetPriceProvider: Send + Sync {
    /// Returns the price of one unit of `asset_id` in USD.
    async fn fetch_usd_price(&self, asset_id: &str) -> Result<f64, FetchError>;
}
