//! Types for the CoinGecko metrics adapter
//!
//! Two families live here: snapshots as returned by the remote API, and the
//! catalog items (types, categories, metric definitions and values) handed
//! to the monitoring host.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry of the full coin list (symbol to id mapping)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinListEntry {
    /// Canonical coin id (e.g. "bitcoin")
    pub id: String,
    /// Lowercase ticker symbol (e.g. "btc")
    pub symbol: String,
    /// Display name
    pub name: String,
}

/// Market snapshot for a single coin
///
/// Superseded wholesale on every poll; numeric fields the API reports as
/// null stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoinMarket {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub market_cap_rank: Option<u32>,
    pub total_volume: Option<f64>,
    pub high_24h: Option<f64>,
    pub low_24h: Option<f64>,
    pub price_change_24h: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub ath: Option<f64>,
    pub ath_change_percentage: Option<f64>,
    pub ath_date: Option<DateTime<Utc>>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl CoinMarket {
    /// Upstream update time, falling back to now when the API omits it
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.last_updated.unwrap_or_else(Utc::now)
    }
}

/// Envelope of the `/global` endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GlobalResponse {
    pub data: GlobalData,
}

/// Aggregate market snapshot, keyed by currency code where applicable
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalData {
    pub active_cryptocurrencies: Option<u64>,
    #[serde(default)]
    pub total_market_cap: HashMap<String, f64>,
    #[serde(default)]
    pub total_volume: HashMap<String, f64>,
    #[serde(default)]
    pub market_cap_percentage: HashMap<String, f64>,
    /// Unix seconds
    pub updated_at: Option<i64>,
}

impl GlobalData {
    /// Upstream update time, falling back to now when absent or out of range
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.updated_at
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .unwrap_or_else(Utc::now)
    }
}

/// Semantic type of a metric
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Text,
    Numeric,
    /// Percentage value (0-100)
    Percentage,
    DateTime,
    /// A metric type registered by this plugin, referenced by id
    Custom(String),
}

/// Unit attached to a registered metric type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub label: String,
    pub abbreviation: String,
}

/// Custom metric type (e.g. the configured currency)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricType {
    pub id: String,
    pub label: String,
    pub value_type: ValueType,
    pub base_unit: Unit,
}

/// Category grouping metrics in the host UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub label: String,
    pub description: String,
}

/// Registered shape of a metric slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDefinition {
    pub id: String,
    pub label: String,
    pub description: String,
    pub value_type: ValueType,
    pub category: String,
    pub group: Option<String>,
    /// Static values never change after the first write
    pub is_static: bool,
}

/// Anything the host accepts through `register`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Item {
    MetricType(MetricType),
    Category(Category),
    Metric(MetricDefinition),
}

impl Item {
    /// Id of the wrapped item
    pub fn id(&self) -> &str {
        match self {
            Item::MetricType(t) => &t.id,
            Item::Category(c) => &c.id,
            Item::Metric(m) => &m.id,
        }
    }
}

/// Payload of a metric value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricData {
    Text(String),
    Number(f64),
    DateTime(DateTime<Utc>),
}

/// Timestamped value for a previously registered metric
///
/// `value` is `None` when the upstream field was null; the host clears the
/// slot in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub value: Option<MetricData>,
}

impl MetricValue {
    pub fn new(id: String, timestamp: DateTime<Utc>, value: Option<MetricData>) -> Self {
        Self {
            id,
            timestamp,
            value,
        }
    }
}
