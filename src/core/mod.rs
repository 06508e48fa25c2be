//! Core business logic abstractions

pub mod config;
pub mod conversion;
pub mod currency;
pub mod error;
pub mod fetcher;
pub mod log;
pub mod price;

// Re-export main types for cleaner imports
pub use conversion::{Direction, ExchangeState, Unit};
pub use currency::CurrencyRateProvider;
pub use error::{FetchError, InputError};
pub use fetcher::RateFetcher;
pub use price::AssetPriceProvider;
