//! # CoinGecko Metrics
//!
//! Polls cryptocurrency market data from CoinGecko and republishes it as
//! typed metrics for a monitoring host.
//!
//! On startup the plugin resolves its settings (currency, coin symbols),
//! registers a fixed catalog of metric definitions for the global market and
//! every resolved coin, then refreshes only the values on a fixed interval.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use coingecko_metrics::{
//!     CoinGeckoPlugin, CoinGeckoProvider, InMemoryHost, PluginSettings, TokioScheduler,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = PluginSettings::new()
//!     .with_setting("update_frequency", "1")
//!     .with_setting("currency", "usd")
//!     .with_setting("coins", "btc,eth");
//!
//! let host = Arc::new(InMemoryHost::new());
//! let mut plugin = CoinGeckoPlugin::new(
//!     Arc::new(CoinGeckoProvider::new()?),
//!     host.clone(),
//!     Arc::new(TokioScheduler::new()),
//! );
//! plugin.init(&settings).await?;
//!
//! if let Some(price) = host.value("m_bitcoin_current_price").await {
//!     println!("BTC: {:?}", price.value);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Configuration errors (unknown currency, missing settings) abort
//! `init`. Remote failures surface as `PluginError::Dependency`, both from
//! `init` and from scheduled ticks; the scheduler logs a failed tick and
//! tries again on the next one.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod currency;
pub mod error;
pub mod host;
pub mod plugin;
pub mod provider;
pub mod providers;
pub mod resolver;
pub mod scheduler;
pub mod settings;
pub mod types;

// Re-export commonly used types
pub use config::ResolvedConfig;
pub use error::{PluginError, ProviderError};
pub use host::{InMemoryHost, MetricHost};
pub use plugin::{CoinGeckoPlugin, MetricUpdater, TickOutcome};
pub use provider::MarketDataProvider;
pub use providers::CoinGeckoProvider;
pub use scheduler::{ScheduledFn, ScheduledTask, Scheduler, TokioScheduler};
pub use settings::PluginSettings;
pub use types::{
    Category, CoinListEntry, CoinMarket, GlobalData, Item, MetricData, MetricDefinition,
    MetricType, MetricValue, Unit, ValueType,
};
