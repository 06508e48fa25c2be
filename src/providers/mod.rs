pub mod coingecko;
pub mod exchangerate_host;
pub mod util;
