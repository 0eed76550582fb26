//! Resolves user supplied coin symbols to canonical coin ids
//!
//! A symbol like "btc" is shared by many coins upstream. The resolver asks
//! the provider for market data on every candidate and keeps, per symbol,
//! the one with the largest market cap.

use crate::{
    constants::GLOBAL_ENTITY_ID, error::PluginError, provider::MarketDataProvider,
};
use std::collections::HashSet;

/// Splits a comma-separated symbol list into trimmed, lowercase tokens
pub fn parse_symbols(raw_csv: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw_csv
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

/// Resolves a comma-separated list of coin symbols to coin ids
///
/// Unknown symbols are dropped silently. Empty or fully unmatched input
/// yields an empty list.
///
/// # Returns
/// Coin ids in market cap descending order, at most one per symbol
///
/// # Errors
/// `PluginError::Dependency` if the coin list or market fetch fails
pub async fn resolve_coin_ids(
    provider: &dyn MarketDataProvider,
    raw_csv: &str,
    currency: &str,
) -> Result<Vec<String>, PluginError> {
    let symbols = parse_symbols(raw_csv);
    if symbols.is_empty() {
        return Ok(Vec::new());
    }

    let coins = provider
        .list_coins()
        .await
        .map_err(|e| PluginError::dependency("coin list", e))?;

    let candidates: Vec<String> = coins
        .into_iter()
        .filter(|c| c.id != GLOBAL_ENTITY_ID)
        .filter(|c| symbols.contains(&c.symbol.to_lowercase()))
        .map(|c| c.id)
        .collect();

    if candidates.is_empty() {
        tracing::warn!(symbols = ?symbols, "None of the configured coins are known to CoinGecko");
        return Ok(Vec::new());
    }

    let markets = provider
        .coin_markets(&candidates, currency)
        .await
        .map_err(|e| PluginError::dependency("coin markets", e))?;

    // markets arrive largest cap first, so the first hit per symbol wins
    let mut taken = HashSet::new();
    let resolved: Vec<String> = markets
        .into_iter()
        .filter(|m| taken.insert(m.symbol.to_lowercase()))
        .map(|m| m.id)
        .collect();

    tracing::debug!(
        requested = symbols.len(),
        candidates = candidates.len(),
        resolved = resolved.len(),
        "Resolved coin symbols"
    );

    Ok(resolved)
}
