use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use super::util::{Endpoint, get_json, http_client};
use crate::core::error::FetchError;
use crate::core::price::AssetPriceProvider;

// CoinGeckoProvider implementation for AssetPriceProvider
pub struct CoinGeckoProvider {
    base_url: String,
    timeout: Duration,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        CoinGeckoProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

/// `simple/price` answers `{"<asset id>": {"usd": <price>}}`.
type SimplePriceResponse = HashMap<String, SimplePriceQuote>;

#[derive(Deserialize, Debug)]
struct SimplePriceQuote {
    usd: Option<f64>,
}

#[async_trait]
impl AssetPriceProvider for CoinGeckoProvider {
    #[instrument(
        name = "CoinGeckoPriceFetch",
        skip(self),
        fields(asset = %asset_id)
    )]
    async fn fetch_usd_price(&self, asset_id: &str) -> Result<f64, FetchError> {
        let endpoint = Endpoint::new(
            &self.base_url,
            "simple/price",
            &[("ids", asset_id), ("vs_currencies", "usd")],
        )?;

        let client = http_client(self.timeout)?;
        let data: SimplePriceResponse = get_json(&client, &endpoint).await?;

        let price = data
            .get(asset_id)
            .and_then(|quote| quote.usd)
            .ok_or_else(|| FetchError::MissingField {
                field: format!("{asset_id}.usd"),
                url: endpoint.to_string(),
            })?;

        debug!(price, "Parsed USD price");
        Ok(price)
    }
}
