use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use super::util::{Endpoint, get_json, http_client};
use crate::core::currency::CurrencyRateProvider;
use crate::core::error::FetchError;

// ExchangeRateHostProvider implementation for CurrencyRateProvider
pub struct ExchangeRateHostProvider {
    base_url: String,
    access_key: Option<String>,
    timeout: Duration,
}

impl ExchangeRateHostProvider {
    pub fn new(base_url: &str, access_key: Option<&str>, timeout: Duration) -> Self {
        ExchangeRateHostProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key: access_key.map(str::to_string),
            timeout,
        }
    }

    /// The access key is a secret parameter so it never shows up in logs or
    /// in the diagnostics printed when a fetch fails.
    fn convert_endpoint(&self, from: &str, to: &str) -> Result<Endpoint, FetchError> {
        let endpoint = Endpoint::new(&self.base_url, "convert", &[("from", from), ("to", to)])?;
        Ok(match &self.access_key {
            Some(key) => endpoint.secret("access_key", key),
            None => endpoint,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    result: Option<f64>,
}

#[async_trait]
impl CurrencyRateProvider for ExchangeRateHostProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self))]
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64, FetchError> {
        let endpoint = self.convert_endpoint(from, to)?;

        let client = http_client(self.timeout)?;
        let data: ConvertResponse = get_json(&client, &endpoint).await?;

        let rate = data.result.ok_or_else(|| FetchError::MissingField {
            field: "result".to_string(),
            url: endpoint.to_string(),
        })?;

        debug!(rate, "Parsed {from}/{to} rate");
        Ok(rate)
    }
}
