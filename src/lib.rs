pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::{shell, ui};
use crate::core::RateFetcher;
use crate::core::config::AppConfig;
use crate::providers::coingecko::CoinGeckoProvider;
use crate::providers::exchangerate_host::ExchangeRateHostProvider;
use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// Runs the calculator on stdin/stdout.
pub async fn run(config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    run_with_io(&config, stdin.lock(), &mut stdout).await
}

/// Fetches both rates, then hands `input` and `output` to the shell.
///
/// Failing to fetch a rate is not an error: a message is written and the
/// function returns `Ok` without showing the menu.
pub async fn run_with_io<R: BufRead, W: Write>(
    config: &AppConfig,
    input: R,
    output: &mut W,
) -> Result<()> {
    info!("coinconv starting...");

    let labels = config.labels();
    writeln!(
        output,
        "{}",
        ui::style_text(
            &format!(
                "{} Converter: {} to USD and {} (live rates)",
                labels.asset, labels.asset, labels.fiat_code
            ),
            ui::StyleType::Title
        )
    )?;

    let timeout = config.timeout();
    let price_provider =
        CoinGeckoProvider::new(&config.providers.coingecko.base_url, timeout);
    let currency_provider = ExchangeRateHostProvider::new(
        &config.providers.exchangerate.base_url,
        config.providers.exchangerate.access_key.as_deref(),
        timeout,
    );
    let fetcher = RateFetcher::new(
        &price_provider,
        &currency_provider,
        &config.asset.id,
        &config.fiat.code,
    );

    let Some(state) = shell::startup(&fetcher, &labels, output).await? else {
        info!("Exiting, rates unavailable");
        return Ok(());
    };

    shell::Shell::new(&state, &labels).run(input, output)
}
