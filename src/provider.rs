//! Provider abstraction for fetching market data from external APIs

use crate::{
    error::ProviderError,
    types::{CoinListEntry, CoinMarket, GlobalData},
};
use async_trait::async_trait;
use std::cmp::Ordering;

/// Trait for remote market data sources
///
/// Every call is a network request and may fail.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Lists every known coin (symbol to id pairs; one symbol may map to many ids)
    async fn list_coins(&self) -> Result<Vec<CoinListEntry>, ProviderError>;

    /// Fetches market snapshots for a set of coin ids
    ///
    /// # Arguments
    /// * `ids` - Coin ids to fetch
    /// * `currency` - Lowercase currency code prices are quoted in
    ///
    /// # Returns
    /// Snapshots ordered by market cap, descending. Unknown ids are omitted.
    async fn coin_markets(
        &self,
        ids: &[String],
        currency: &str,
    ) -> Result<Vec<CoinMarket>, ProviderError>;

    /// Fetches the global market snapshot
    async fn global(&self) -> Result<GlobalData, ProviderError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}

/// Stable descending sort by market cap; snapshots without a cap go last
pub fn sort_by_market_cap_desc(markets: &mut [CoinMarket]) {
    markets.sort_by(|a, b| match (a.market_cap, b.market_cap) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
