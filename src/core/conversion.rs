//! Conversion arithmetic between the asset, USD and the fiat currency.
//!
//! Every amount moving between the asset and the fiat currency goes through
//! USD: the asset price gives the asset/USD leg and the exchange rate gives
//! the USD/fiat leg.

use std::fmt::Display;

/// The three units an amount can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Asset,
    Usd,
    Fiat,
}

/// One of the four conversions offered by the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    AssetToUsd,
    AssetToFiat,
    UsdToAsset,
    FiatToAsset,
}

impl Direction {
    /// Menu order.
    pub const ALL: [Direction; 4] = [
        Direction::AssetToUsd,
        Direction::AssetToFiat,
        Direction::UsdToAsset,
        Direction::FiatToAsset,
    ];

    pub fn source(&self) -> Unit {
        match self {
            Direction::AssetToUsd | Direction::AssetToFiat => Unit::Asset,
            Direction::UsdToAsset => Unit::Usd,
            Direction::FiatToAsset => Unit::Fiat,
        }
    }

    pub fn target(&self) -> Unit {
        match self {
            Direction::AssetToUsd => Unit::Usd,
            Direction::AssetToFiat => Unit::Fiat,
            Direction::UsdToAsset | Direction::FiatToAsset => Unit::Asset,
        }
    }
}

/// Rates fetched once at startup and read-only afterwards.
///
/// A rate that is zero, negative or not finite is stored as absent, so the
/// divisions below never see a zero divisor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExchangeState {
    asset_price_usd: Option<f64>,
    usd_to_fiat_rate: Option<f64>,
}

fn usable(rate: Option<f64>) -> Option<f64> {
    rate.filter(|r| r.is_finite() && *r > 0.0)
}

impl ExchangeState {
    pub fn new(asset_price_usd: Option<f64>, usd_to_fiat_rate: Option<f64>) -> Self {
        Self {
            asset_price_usd: usable(asset_price_usd),
            usd_to_fiat_rate: usable(usd_to_fiat_rate),
        }
    }

    pub fn asset_price_usd(&self) -> Option<f64> {
        self.asset_price_usd
    }

    pub fn usd_to_fiat_rate(&self) -> Option<f64> {
        self.usd_to_fiat_rate
    }

    /// True when both rates are present.
    pub fn is_complete(&self) -> bool {
        self.asset_price_usd.is_some() && self.usd_to_fiat_rate.is_some()
    }

    pub fn asset_to_usd(&self, amount: f64) -> Option<f64> {
        self.asset_price_usd.map(|price| amount * price)
    }

    pub fn asset_to_fiat(&self, amount: f64) -> Option<f64> {
        let usd = self.asset_to_usd(amount)?;
        self.usd_to_fiat_rate.map(|rate| usd * rate)
    }

    pub fn usd_to_asset(&self, amount: f64) -> Option<f64> {
        self.asset_price_usd.map(|price| amount / price)
    }

    pub fn fiat_to_asset(&self, amount: f64) -> Option<f64> {
        let usd = self.usd_to_fiat_rate.map(|rate| amount / rate)?;
        self.usd_to_asset(usd)
    }

    pub fn convert(&self, direction: Direction, amount: f64) -> Option<f64> {
        match direction {
            Direction::AssetToUsd => self.asset_to_usd(amount),
            Direction::AssetToFiat => self.asset_to_fiat(amount),
            Direction::UsdToAsset => self.usd_to_asset(amount),
            Direction::FiatToAsset => self.fiat_to_asset(amount),
        }
    }
}

impl Display for ExchangeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |rate: Option<f64>| rate.map_or("N/A".to_string(), |r| r.to_string());
        write!(
            f,
            "asset/USD={}, USD/fiat={}",
            show(self.asset_price_usd),
            show(self.usd_to_fiat_rate)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn sample_state() -> ExchangeState {
        ExchangeState::new(Some(0.42), Some(4.70))
    }

    #[test]
    fn test_asset_to_fiat_goes_through_usd() {
        let state = sample_state();
        let usd = state.asset_to_usd(10.0).unwrap();
        assert!((usd - 4.2).abs() < EPSILON);

        let fiat = state.asset_to_fiat(10.0).unwrap();
        assert!((fiat - 19.74).abs() < EPSILON);
        assert_eq!(format!("{fiat:.2}"), "19.74");
    }

    #[test]
    fn test_fiat_to_asset_inverts_asset_to_fiat() {
        let state = sample_state();
        let asset = state.fiat_to_asset(19.74).unwrap();
        assert!((asset - 10.0).abs() < 1e-6);
        assert_eq!(format!("{asset:.2}"), "10.00");
    }

    #[test]
    fn test_round_trips() {
        for (price, rate) in [(0.42, 4.70), (65_000.0, 0.92), (1e-6, 150.0)] {
            let state = ExchangeState::new(Some(price), Some(rate));
            for amount in [0.01, 1.0, 10.0, 12_345.678] {
                let back = state
                    .usd_to_asset(state.asset_to_usd(amount).unwrap())
                    .unwrap();
                assert!((back - amount).abs() <= amount * EPSILON);

                let back = state
                    .fiat_to_asset(state.asset_to_fiat(amount).unwrap())
                    .unwrap();
                assert!((back - amount).abs() <= amount * EPSILON);
            }
        }
    }

    #[test]
    fn test_missing_rates_give_no_result() {
        let empty = ExchangeState::default();
        for direction in Direction::ALL {
            assert!(empty.convert(direction, 1.0).is_none());
        }

        let price_only = ExchangeState::new(Some(0.42), None);
        assert!(price_only.asset_to_usd(1.0).is_some());
        assert!(price_only.usd_to_asset(1.0).is_some());
        assert!(price_only.asset_to_fiat(1.0).is_none());
        assert!(price_only.fiat_to_asset(1.0).is_none());

        let rate_only = ExchangeState::new(None, Some(4.70));
        for direction in Direction::ALL {
            assert!(rate_only.convert(direction, 1.0).is_none());
        }
    }

    #[test]
    fn test_unusable_rates_are_absent() {
        let state = ExchangeState::new(Some(0.0), Some(f64::NAN));
        assert_eq!(state, ExchangeState::default());
        assert!(!state.is_complete());

        let state = ExchangeState::new(Some(-1.0), Some(f64::INFINITY));
        assert!(state.asset_price_usd().is_none());
        assert!(state.usd_to_fiat_rate().is_none());
        assert!(state.usd_to_asset(5.0).is_none());
    }

    #[test]
    fn test_engine_does_not_validate_sign() {
        let state = sample_state();
        assert_eq!(state.asset_to_usd(0.0), Some(0.0));
        assert!(state.asset_to_usd(-1.0).unwrap() < 0.0);
    }

    #[test]
    fn test_direction_units() {
        assert_eq!(Direction::AssetToFiat.source(), Unit::Asset);
        assert_eq!(Direction::AssetToFiat.target(), Unit::Fiat);
        assert_eq!(Direction::FiatToAsset.source(), Unit::Fiat);
        assert_eq!(Direction::UsdToAsset.target(), Unit::Asset);
    }
}
