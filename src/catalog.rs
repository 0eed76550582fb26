//! Metric catalog mapping
//!
//! Pure functions turning market snapshots into metric definitions and
//! values. Each field is declared once in a table together with the function
//! that extracts it from a snapshot, so every definition has exactly one
//! value and vice versa.
//!
//! Metric ids are `m_<entity>_<field>`, where the entity is a coin id or
//! `global`.

use crate::{
    constants::{CATEGORY_COINS_ID, CATEGORY_GLOBAL_ID, GLOBAL_ENTITY_ID},
    types::{CoinMarket, GlobalData, MetricData, MetricDefinition, MetricValue, ValueType},
};

/// Value kind of a catalog field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Numeric,
    Percentage,
    DateTime,
    /// Denominated in the configured currency
    Currency,
}

impl FieldKind {
    fn value_type(self, currency_type_id: &str) -> ValueType {
        match self {
            FieldKind::Text => ValueType::Text,
            FieldKind::Numeric => ValueType::Numeric,
            FieldKind::Percentage => ValueType::Percentage,
            FieldKind::DateTime => ValueType::DateTime,
            FieldKind::Currency => ValueType::Custom(currency_type_id.to_string()),
        }
    }
}

/// One per-coin metric
pub struct CoinField {
    pub key: &'static str,
    pub kind: FieldKind,
    pub label: &'static str,
    pub description: &'static str,
    pub is_static: bool,
    extract: fn(&CoinMarket) -> Option<MetricData>,
}

/// One global market metric
pub struct GlobalField {
    pub key: &'static str,
    pub kind: FieldKind,
    pub label: &'static str,
    pub description: &'static str,
    extract: fn(&GlobalData, &str) -> Option<MetricData>,
}

fn number(value: Option<f64>) -> Option<MetricData> {
    value.map(MetricData::Number)
}

macro_rules! coin_field {
    ($key:ident, $kind:ident, $label:literal, $desc:literal) => {
        coin_field!($key, $kind, $label, $desc, false, |c| number(c.$key))
    };
    ($key:ident, $kind:ident, $label:literal, $desc:literal, $static:literal, $extract:expr) => {
        CoinField {
            key: stringify!($key),
            kind: FieldKind::$kind,
            label: $label,
            description: $desc,
            is_static: $static,
            extract: $extract,
        }
    };
}

/// Every metric published per coin
///
/// The coin's display name has no slot of its own; it prefixes the label of
/// each coin metric (see [`define_coin_metrics`]). `symbol` is published as
/// returned upstream (lowercase for CoinGecko).
pub static COIN_FIELDS: [CoinField; 14] = [
    coin_field!(symbol, Text, "Symbol", "Ticker symbol", true, |c| Some(
        MetricData::Text(c.symbol.clone())
    )),
    coin_field!(current_price, Currency, "Price", "Current price"),
    coin_field!(market_cap, Currency, "Market cap", "Market capitalization"),
    coin_field!(
        market_cap_rank,
        Numeric,
        "Market cap rank",
        "Rank by market capitalization",
        false,
        |c| c.market_cap_rank.map(|r| MetricData::Number(f64::from(r)))
    ),
    coin_field!(total_volume, Currency, "Volume", "Trading volume over the last 24 hours"),
    coin_field!(high_24h, Currency, "24h high", "Highest price over the last 24 hours"),
    coin_field!(low_24h, Currency, "24h low", "Lowest price over the last 24 hours"),
    coin_field!(price_change_24h, Currency, "24h change", "Price change over the last 24 hours"),
    coin_field!(
        price_change_percentage_24h,
        Percentage,
        "24h change %",
        "Relative price change over the last 24 hours"
    ),
    coin_field!(circulating_supply, Numeric, "Circulating supply", "Coins in circulation"),
    coin_field!(total_supply, Numeric, "Total supply", "Coins in existence"),
    coin_field!(ath, Currency, "All-time high", "Highest price ever recorded"),
    coin_field!(
        ath_change_percentage,
        Percentage,
        "From all-time high %",
        "Relative distance of the current price to the all-time high"
    ),
    coin_field!(
        ath_date,
        DateTime,
        "All-time high date",
        "Date the all-time high was recorded",
        false,
        |c| c.ath_date.map(MetricData::DateTime)
    ),
];

/// Every global market metric
pub static GLOBAL_FIELDS: [GlobalField; 5] = [
    GlobalField {
        key: "active_cryptocurrencies",
        kind: FieldKind::Numeric,
        label: "Active cryptocurrencies",
        description: "Number of actively traded cryptocurrencies",
        extract: |g, _| g.active_cryptocurrencies.map(|n| MetricData::Number(n as f64)),
    },
    GlobalField {
        key: "total_market_cap",
        kind: FieldKind::Currency,
        label: "Total market cap",
        description: "Combined market capitalization of all cryptocurrencies",
        extract: |g, currency| number(g.total_market_cap.get(currency).copied()),
    },
    GlobalField {
        key: "total_volume",
        kind: FieldKind::Currency,
        label: "Total volume",
        description: "Combined trading volume over the last 24 hours",
        extract: |g, currency| number(g.total_volume.get(currency).copied()),
    },
    GlobalField {
        key: "market_cap_percentage_btc",
        kind: FieldKind::Percentage,
        label: "Bitcoin dominance",
        description: "Bitcoin share of the total market capitalization",
        extract: |g, _| number(g.market_cap_percentage.get("btc").copied()),
    },
    GlobalField {
        key: "market_cap_percentage_eth",
        kind: FieldKind::Percentage,
        label: "Ethereum dominance",
        description: "Ethereum share of the total market capitalization",
        extract: |g, _| number(g.market_cap_percentage.get("eth").copied()),
    },
];

/// Builds the id of a metric slot
pub fn metric_id(entity_id: &str, field: &str) -> String {
    format!("m_{}_{}", entity_id, field)
}

/// Defines the metrics of one coin
///
/// # Arguments
/// * `coin_id` - Canonical coin id
/// * `display_name` - Coin name used in the metric labels
/// * `currency_type_id` - Id of the registered currency metric type
pub fn define_coin_metrics(
    coin_id: &str,
    display_name: &str,
    currency_type_id: &str,
) -> Vec<MetricDefinition> {
    COIN_FIELDS
        .iter()
        .map(|field| MetricDefinition {
            id: metric_id(coin_id, field.key),
            label: format!("{} {}", display_name, field.label),
            description: field.description.to_string(),
            value_type: field.kind.value_type(currency_type_id),
            category: CATEGORY_COINS_ID.to_string(),
            group: None,
            is_static: field.is_static,
        })
        .collect()
}

/// Defines the global market metrics
pub fn define_global_metrics(currency_type_id: &str) -> Vec<MetricDefinition> {
    GLOBAL_FIELDS
        .iter()
        .map(|field| MetricDefinition {
            id: metric_id(GLOBAL_ENTITY_ID, field.key),
            label: field.label.to_string(),
            description: field.description.to_string(),
            value_type: field.kind.value_type(currency_type_id),
            category: CATEGORY_GLOBAL_ID.to_string(),
            group: None,
            is_static: false,
        })
        .collect()
}

/// Projects a coin snapshot onto its metric values
pub fn coin_values(market: &CoinMarket) -> Vec<MetricValue> {
    let timestamp = market.timestamp();
    COIN_FIELDS
        .iter()
        .map(|field| {
            MetricValue::new(
                metric_id(&market.id, field.key),
                timestamp,
                (field.extract)(market),
            )
        })
        .collect()
}

/// Projects the global snapshot onto its metric values
///
/// Currency keyed fields read the entry for `currency`; a missing entry
/// yields an empty value.
pub fn global_values(global: &GlobalData, currency: &str) -> Vec<MetricValue> {
    let timestamp = global.timestamp();
    GLOBAL_FIELDS
        .iter()
        .map(|field| {
            MetricValue::new(
                metric_id(GLOBAL_ENTITY_ID, field.key),
                timestamp,
                (field.extract)(global, currency),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TYPE_CURRENCY_ID;
    use chrono::{TimeZone, Utc};
    use std::collections::{HashMap, HashSet};

    fn bitcoin() -> CoinMarket {
        CoinMarket {
            id: "bitcoin".to_string(),
            symbol: "btc".to_string(),
            name: "Bitcoin".to_string(),
            current_price: Some(67000.0),
            market_cap: Some(1.3e12),
            market_cap_rank: Some(1),
            total_volume: Some(2.5e10),
            high_24h: Some(68000.0),
            low_24h: Some(66000.0),
            price_change_24h: Some(-500.0),
            price_change_percentage_24h: Some(-0.7),
            circulating_supply: Some(19_650_000.0),
            total_supply: Some(21_000_000.0),
            ath: Some(73738.0),
            ath_change_percentage: Some(-9.1),
            ath_date: Some(Utc.with_ymd_and_hms(2024, 3, 14, 7, 10, 36).unwrap()),
            last_updated: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
        }
    }

    fn global() -> GlobalData {
        GlobalData {
            active_cryptocurrencies: Some(14000),
            total_market_cap: HashMap::from([("usd".to_string(), 2.5e12)]),
            total_volume: HashMap::from([("usd".to_string(), 9.0e10)]),
            market_cap_percentage: HashMap::from([
                ("btc".to_string(), 52.0),
                ("eth".to_string(), 17.0),
            ]),
            updated_at: Some(1_714_564_800),
        }
    }

    fn ids_of_defs(defs: &[MetricDefinition]) -> HashSet<String> {
        defs.iter().map(|d| d.id.clone()).collect()
    }

    fn ids_of_values(values: &[MetricValue]) -> HashSet<String> {
        values.iter().map(|v| v.id.clone()).collect()
    }

    #[test]
    fn test_coin_definitions_match_values() {
        let market = bitcoin();
        let defs = define_coin_metrics(&market.id, &market.name, TYPE_CURRENCY_ID);
        let values = coin_values(&market);

        assert_eq!(defs.len(), 14);
        assert_eq!(values.len(), 14);
        assert_eq!(ids_of_defs(&defs), ids_of_values(&values));
        assert_eq!(ids_of_defs(&defs).len(), 14);
    }

    #[test]
    fn test_global_definitions_match_values() {
        let defs = define_global_metrics(TYPE_CURRENCY_ID);
        let values = global_values(&global(), "usd");

        assert_eq!(defs.len(), 5);
        assert_eq!(ids_of_defs(&defs), ids_of_values(&values));
        assert!(defs.iter().all(|d| d.category == CATEGORY_GLOBAL_ID && !d.is_static));
    }

    #[test]
    fn test_coin_definition_shape() {
        let defs = define_coin_metrics("bitcoin", "Bitcoin", TYPE_CURRENCY_ID);
        let by_id: HashMap<_, _> = defs.iter().map(|d| (d.id.as_str(), d)).collect();

        let symbol = by_id["m_bitcoin_symbol"];
        assert!(symbol.is_static);
        assert_eq!(symbol.value_type, ValueType::Text);
        assert_eq!(symbol.label, "Bitcoin Symbol");

        let price = by_id["m_bitcoin_current_price"];
        assert!(!price.is_static);
        assert_eq!(price.value_type, ValueType::Custom(TYPE_CURRENCY_ID.to_string()));

        assert_eq!(
            by_id["m_bitcoin_price_change_percentage_24h"].value_type,
            ValueType::Percentage
        );
        assert_eq!(by_id["m_bitcoin_ath_date"].value_type, ValueType::DateTime);
        assert_eq!(by_id["m_bitcoin_market_cap_rank"].value_type, ValueType::Numeric);

        assert!(defs.iter().all(|d| d.category == CATEGORY_COINS_ID && d.group.is_none()));
        assert_eq!(defs.iter().filter(|d| d.is_static).count(), 1);
    }

    #[test]
    fn test_currency_fields() {
        let currency: Vec<&str> = COIN_FIELDS
            .iter()
            .filter(|f| f.kind == FieldKind::Currency)
            .map(|f| f.key)
            .collect();
        assert_eq!(
            currency,
            vec![
                "current_price",
                "market_cap",
                "total_volume",
                "high_24h",
                "low_24h",
                "price_change_24h",
                "ath"
            ]
        );
    }

    #[test]
    fn test_ids_are_stable_across_snapshots() {
        let first = coin_values(&bitcoin());
        let mut changed = bitcoin();
        changed.current_price = Some(1.0);
        changed.last_updated = None;
        let second = coin_values(&changed);

        let first_ids: Vec<_> = first.iter().map(|v| &v.id).collect();
        let second_ids: Vec<_> = second.iter().map(|v| &v.id).collect();
        assert_eq!(first_ids, second_ids);
        assert_ne!(first[1].value, second[1].value);
    }

    #[test]
    fn test_coin_values_content() {
        let market = bitcoin();
        let values = coin_values(&market);
        let by_id: HashMap<_, _> = values.iter().map(|v| (v.id.as_str(), v)).collect();

        assert_eq!(
            by_id["m_bitcoin_symbol"].value,
            Some(MetricData::Text("btc".to_string()))
        );
        assert_eq!(
            by_id["m_bitcoin_market_cap_rank"].value,
            Some(MetricData::Number(1.0))
        );
        assert_eq!(
            by_id["m_bitcoin_ath_date"].value,
            Some(MetricData::DateTime(market.ath_date.unwrap()))
        );
        assert!(values.iter().all(|v| v.timestamp == market.last_updated.unwrap()));
    }

    #[test]
    fn test_missing_timestamp_falls_back_to_now() {
        let mut market = bitcoin();
        market.last_updated = None;
        let before = Utc::now();
        let values = coin_values(&market);

        assert!(values.iter().all(|v| v.timestamp >= before));

        let mut snapshot = global();
        snapshot.updated_at = None;
        let values = global_values(&snapshot, "usd");
        assert!(values.iter().all(|v| v.timestamp >= before));
    }

    #[test]
    fn test_null_fields_yield_empty_values() {
        let mut market = bitcoin();
        market.total_supply = None;
        let values = coin_values(&market);
        let total_supply = values.iter().find(|v| v.id == "m_bitcoin_total_supply").unwrap();
        assert!(total_supply.value.is_none());
    }

    #[test]
    fn test_global_values_use_currency() {
        let values = global_values(&global(), "usd");
        let by_id: HashMap<_, _> = values.iter().map(|v| (v.id.as_str(), v)).collect();

        assert_eq!(
            by_id["m_global_total_market_cap"].value,
            Some(MetricData::Number(2.5e12))
        );
        assert_eq!(
            by_id["m_global_market_cap_percentage_eth"].value,
            Some(MetricData::Number(17.0))
        );
        assert_eq!(
            by_id["m_global_active_cryptocurrencies"].timestamp,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
        );

        let values = global_values(&global(), "eur");
        let total = values.iter().find(|v| v.id == "m_global_total_market_cap").unwrap();
        assert!(total.value.is_none());
    }

    #[test]
    fn test_coin_and_global_ids_do_not_collide() {
        let mut ids = ids_of_defs(&define_global_metrics(TYPE_CURRENCY_ID));
        for coin in ["bitcoin", "ethereum", "bitcoin-cash"] {
            for def in define_coin_metrics(coin, coin, TYPE_CURRENCY_ID) {
                assert!(ids.insert(def.id), "duplicate id");
            }
        }
        assert_eq!(ids.len(), 5 + 3 * 14);
    }
}
