use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

use crate::core::conversion::Unit;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AssetConfig {
    /// Identifier understood by the price source, e.g. `pi-network`.
    pub id: String,
    /// Label shown to the user, e.g. `PI`.
    pub symbol: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        AssetConfig {
            id: "pi-network".to_string(),
            symbol: "PI".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FiatConfig {
    /// ISO currency code, e.g. `MYR`.
    pub code: String,
    /// Prefix printed before amounts, e.g. `RM`.
    pub symbol: String,
}

impl Default for FiatConfig {
    fn default() -> Self {
        FiatConfig {
            code: "MYR".to_string(),
            symbol: "RM".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CoinGeckoProviderConfig {
    pub base_url: String,
}

impl Default for CoinGeckoProviderConfig {
    fn default() -> Self {
        CoinGeckoProviderConfig {
            base_url: "https://api.coingecko.com/api/v3".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, PartialEq)]
pub struct ExchangeRateProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub access_key: Option<String>,
}

// The config is logged with `{:#?}`; only show whether a key is set.
impl std::fmt::Debug for ExchangeRateProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeRateProviderConfig")
            .field("base_url", &self.base_url)
            .field("access_key", &self.access_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for ExchangeRateProviderConfig {
    fn default() -> Self {
        ExchangeRateProviderConfig {
            base_url: "https://api.exchangerate.host".to_string(),
            access_key: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub coingecko: CoinGeckoProviderConfig,
    #[serde(default)]
    pub exchangerate: ExchangeRateProviderConfig,
}

fn default_timeout_secs() -> u64 {
    5
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub asset: AssetConfig,
    #[serde(default)]
    pub fiat: FiatConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            asset: AssetConfig::default(),
            fiat: FiatConfig::default(),
            providers: ProvidersConfig::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to the
    /// built-in defaults when no file exists there.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "coinconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn labels(&self) -> UnitLabels {
        UnitLabels {
            asset: self.asset.symbol.clone(),
            fiat_code: self.fiat.code.clone(),
            fiat_symbol: self.fiat.symbol.clone(),
        }
    }
}

/// Display labels for the three units.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitLabels {
    pub asset: String,
    pub fiat_code: String,
    pub fiat_symbol: String,
}

impl Default for UnitLabels {
    fn default() -> Self {
        AppConfig::default().labels()
    }
}

impl UnitLabels {
    /// Short name used in the menu.
    pub fn name(&self, unit: Unit) -> &str {
        match unit {
            Unit::Asset => &self.asset,
            Unit::Usd => "USD",
            Unit::Fiat => &self.fiat_code,
        }
    }

    /// Formats an amount with two decimals, e.g. `10.00 PI`, `$4.20 USD`
    /// or `RM19.74 MYR`.
    pub fn format_amount(&self, unit: Unit, amount: f64) -> String {
        match unit {
            Unit::Asset => format!("{amount:.2} {}", self.asset),
            Unit::Usd => format!("${amount:.2} USD"),
            Unit::Fiat => format!("{}{amount:.2} {}", self.fiat_symbol, self.fiat_code),
        }
    }
}
