//! Constants for the CoinGecko metrics adapter
//!
//! Remote API endpoints, timing defaults and the identifiers of every
//! catalog item this crate registers with the host live here.

use std::time::Duration;

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Endpoint listing every known coin (id, symbol, name)
pub const COINGECKO_COINS_LIST_ENDPOINT: &str = "/coins/list";

/// Endpoint returning market snapshots for a set of coin ids
pub const COINGECKO_COINS_MARKETS_ENDPOINT: &str = "/coins/markets";

/// Endpoint returning the global market snapshot
pub const COINGECKO_GLOBAL_ENDPOINT: &str = "/global";

/// Header carrying an optional demo API key
pub const COINGECKO_API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// Maximum page size accepted by the markets endpoint
pub const MARKETS_PAGE_SIZE: usize = 250;

/// HTTP request timeout (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// User agent for HTTP requests. CoinGecko rejects requests without one.
pub const USER_AGENT: &str = concat!("coingecko-metrics/", env!("CARGO_PKG_VERSION"));

/// Delay between plugin initialization and the first scheduled tick
pub const INITIAL_DELAY: Duration = Duration::from_secs(5);

/// Update frequency used when the setting is absent (in minutes)
pub const DEFAULT_UPDATE_FREQUENCY_MINUTES: u64 = 10;

/// Setting key: update frequency in whole minutes
pub const SETTING_UPDATE_FREQUENCY: &str = "update_frequency";

/// Setting key: lowercase currency code (e.g. "usd")
pub const SETTING_CURRENCY: &str = "currency";

/// Setting key: comma-separated coin symbols (e.g. "btc,eth")
pub const SETTING_COINS: &str = "coins";

/// Id of the registered currency metric type
pub const TYPE_CURRENCY_ID: &str = "t_currency";

/// Category of all per-coin metrics
pub const CATEGORY_COINS_ID: &str = "c_coins";

/// Category of the global market metrics
pub const CATEGORY_GLOBAL_ID: &str = "c_global";

/// Entity key used for global metric ids
pub const GLOBAL_ENTITY_ID: &str = "global";
