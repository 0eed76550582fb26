//! Runs the plugin locally against the live CoinGecko API
//!
//! ```text
//! RUST_LOG=debug cargo run --example local_run
//! COINGECKO_CURRENCY=eur COINGECKO_COINS=btc,sol cargo run --example local_run
//! ```

use coingecko_metrics::{
    constants::{SETTING_COINS, SETTING_CURRENCY, SETTING_UPDATE_FREQUENCY},
    CoinGeckoPlugin, CoinGeckoProvider, InMemoryHost, PluginSettings, TokioScheduler,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // COINGECKO_* variables override the defaults below
    let settings = PluginSettings::from_env().with_fallback(
        PluginSettings::new()
            .with_setting(SETTING_UPDATE_FREQUENCY, "1")
            .with_setting(SETTING_CURRENCY, "usd")
            .with_setting(SETTING_COINS, "btc,eth,grc"),
    );

    let host = Arc::new(InMemoryHost::new());
    let mut plugin = CoinGeckoPlugin::new(
        Arc::new(CoinGeckoProvider::new()?),
        host.clone(),
        Arc::new(TokioScheduler::new()),
    );
    plugin.init(&settings).await?;

    let mut values: Vec<_> = host.values().await.into_values().collect();
    values.sort_by(|a, b| a.id.cmp(&b.id));
    for value in values {
        println!("{:<45} {:?}", value.id, value.value);
    }

    println!("Updating periodically, press Ctrl+C to stop");
    tokio::signal::ctrl_c().await?;
    plugin.dispose();

    Ok(())
}
