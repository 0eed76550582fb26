//! Resolved plugin configuration
//!
//! Built once during initialization and never mutated afterwards; the poll
//! loop only ever reads it.

use crate::{
    constants::{
        DEFAULT_UPDATE_FREQUENCY_MINUTES, SETTING_COINS, SETTING_CURRENCY,
        SETTING_UPDATE_FREQUENCY,
    },
    currency::currency_symbol,
    error::PluginError,
    provider::MarketDataProvider,
    resolver::resolve_coin_ids,
    settings::PluginSettings,
};
use std::time::Duration;

/// Configuration produced by the Configure phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Interval between scheduled ticks
    pub update_frequency: Duration,
    /// Lowercase currency code
    pub currency: String,
    /// Display symbol of `currency`
    pub currency_symbol: &'static str,
    /// Coin ids frozen for the lifetime of the plugin
    pub coin_ids: Vec<String>,
}

impl ResolvedConfig {
    /// Reads the settings and resolves currency and coins
    ///
    /// # Errors
    /// * `PluginError::Configuration` for missing/invalid settings or an
    ///   unsupported currency
    /// * `PluginError::Dependency` if coin resolution cannot reach the API
    pub async fn resolve(
        settings: &PluginSettings,
        provider: &dyn MarketDataProvider,
    ) -> Result<Self, PluginError> {
        let minutes: u64 =
            settings.get_value_or(SETTING_UPDATE_FREQUENCY, DEFAULT_UPDATE_FREQUENCY_MINUTES)?;
        if minutes == 0 {
            return Err(PluginError::configuration(
                "Update frequency must be at least one minute",
            ));
        }
        let update_frequency = minutes
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(|| {
                PluginError::configuration(format!(
                    "Update frequency of {} minutes is too large",
                    minutes
                ))
            })?;
        tracing::info!(?update_frequency, "Configured update frequency");

        let currency = settings
            .get_value::<String>(SETTING_CURRENCY)?
            .trim()
            .to_lowercase();
        let currency_symbol = currency_symbol(&currency)?;
        tracing::info!(%currency, currency_symbol, "Configured currency");

        let coins_csv: String = settings.get_value_or(SETTING_COINS, String::new())?;
        let coin_ids = resolve_coin_ids(provider, &coins_csv, &currency).await?;
        tracing::info!(coin_ids = %coin_ids.join(","), "Configured coin ids");

        Ok(Self {
            update_frequency,
            currency,
            currency_symbol,
            coin_ids,
        })
    }
}
