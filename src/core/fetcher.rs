//! Startup retrieval of the two rates the conversions depend on.

use crate::core::conversion::ExchangeState;
use crate::core::currency::CurrencyRateProvider;
use crate::core::error::FetchError;
use crate::core::price::AssetPriceProvider;
use tracing::{debug, warn};

/// Fetches the asset's USD price and the USD to fiat rate, one request each.
pub struct RateFetcher<'a> {
    price_provider: &'a dyn AssetPriceProvider,
    currency_provider: &'a dyn CurrencyRateProvider,
    asset_id: &'a str,
    fiat_code: &'a str,
}

impl<'a> RateFetcher<'a> {
    pub fn new(
        price_provider: &'a dyn AssetPriceProvider,
        currency_provider: &'a dyn CurrencyRateProvider,
        asset_id: &'a str,
        fiat_code: &'a str,
    ) -> Self {
        Self {
            price_provider,
            currency_provider,
            asset_id,
            fiat_code,
        }
    }

    pub async fn fetch_asset_price_usd(&self) -> Result<f64, FetchError> {
        self.price_provider.fetch_usd_price(self.asset_id).await
    }

    pub async fn fetch_usd_to_fiat_rate(&self) -> Result<f64, FetchError> {
        self.currency_provider.get_rate("USD", self.fiat_code).await
    }

    /// Runs both fetches in order and collects whatever succeeded.
    ///
    /// A failed fetch leaves its rate absent; `report` receives one
    /// human-readable line per failure.
    pub async fn fetch_state(&self, mut report: impl FnMut(String)) -> ExchangeState {
        let asset_price_usd = match self.fetch_asset_price_usd().await {
            Ok(price) => Some(price),
            Err(e) => {
                warn!(error = %e, asset = self.asset_id, "Asset price fetch failed");
                report(format!("Error fetching {} price: {e}", self.asset_id));
                None
            }
        };

        let usd_to_fiat_rate = match self.fetch_usd_to_fiat_rate().await {
            Ok(rate) => Some(rate),
            Err(e) => {
                warn!(error = %e, fiat = self.fiat_code, "Fiat rate fetch failed");
                report(format!("Error fetching USD to {} rate: {e}", self.fiat_code));
                None
            }
        };

        let state = ExchangeState::new(asset_price_usd, usd_to_fiat_rate);
        if let (Some(price), None) = (asset_price_usd, state.asset_price_usd()) {
            report(format!("Ignoring unusable {} price: {price}", self.asset_id));
        }
        if let (Some(rate), None) = (usd_to_fiat_rate, state.usd_to_fiat_rate()) {
            report(format!("Ignoring unusable USD to {} rate: {rate}", self.fiat_code));
        }
        debug!(%state, "Fetched exchange state");
        state
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Canned provider answering every request with the same outcome and
    /// recording what was asked for.
    pub(crate) struct FixedRate {
        rate: Option<f64>,
        pub(crate) requests: Mutex<Vec<String>>,
    }

    impl FixedRate {
        pub(crate) fn ok(rate: f64) -> Self {
            Self {
                rate: Some(rate),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                rate: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn answer(&self, request: String) -> Result<f64, FetchError> {
            self.requests.lock().unwrap().push(request.clone());
            self.rate.ok_or(FetchError::MissingField {
                field: "rate".to_string(),
                url: request,
            })
        }
    }

    #[async_trait]
    impl AssetPriceProvider for FixedRate {
        async fn fetch_usd_price(&self, asset_id: &str) -> Result<f64, FetchError> {
            self.answer(asset_id.to_string())
        }
    }

    #[async_trait]
    impl CurrencyRateProvider for FixedRate {
        async fn get_rate(&self, from: &str, to: &str) -> Result<f64, FetchError> {
            self.answer(format!("{from}/{to}"))
        }
    }

    #[tokio::test]
    async fn test_fetch_state_with_both_rates() {
        let price = FixedRate::ok(0.42);
        let fx = FixedRate::ok(4.70);
        let fetcher = RateFetcher::new(&price, &fx, "pi-network", "MYR");

        let mut reports = Vec::new();
        let state = fetcher.fetch_state(|line| reports.push(line)).await;

        assert!(state.is_complete());
        assert_eq!(state.asset_price_usd(), Some(0.42));
        assert_eq!(state.usd_to_fiat_rate(), Some(4.70));
        assert!(reports.is_empty());
        assert_eq!(*price.requests.lock().unwrap(), vec!["pi-network"]);
        assert_eq!(*fx.requests.lock().unwrap(), vec!["USD/MYR"]);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_rate_absent() {
        let price = FixedRate::failing();
        let fx = FixedRate::ok(4.70);
        let fetcher = RateFetcher::new(&price, &fx, "pi-network", "MYR");

        let mut reports = Vec::new();
        let state = fetcher.fetch_state(|line| reports.push(line)).await;

        assert!(!state.is_complete());
        assert!(state.asset_price_usd().is_none());
        assert_eq!(state.usd_to_fiat_rate(), Some(4.70));
        assert_eq!(reports.len(), 1);
        assert!(reports[0].starts_with("Error fetching pi-network price:"));
        // The fiat fetch still runs after the asset fetch failed
        assert_eq!(fx.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_both_fetches_failing() {
        let price = FixedRate::failing();
        let fx = FixedRate::failing();
        let fetcher = RateFetcher::new(&price, &fx, "pi-network", "MYR");

        let mut reports = Vec::new();
        let state = fetcher.fetch_state(|line| reports.push(line)).await;

        assert_eq!(state, ExchangeState::default());
        assert_eq!(reports.len(), 2);
        assert!(reports[1].starts_with("Error fetching USD to MYR rate:"));
    }

    #[tokio::test]
    async fn test_zero_rate_is_treated_as_absent() {
        let price = FixedRate::ok(0.0);
        let fx = FixedRate::ok(4.70);
        let fetcher = RateFetcher::new(&price, &fx, "pi-network", "MYR");

        let mut reports = Vec::new();
        let state = fetcher.fetch_state(|line| reports.push(line)).await;
        assert!(!state.is_complete());
        assert_eq!(reports, vec!["Ignoring unusable pi-network price: 0"]);
    }
}
