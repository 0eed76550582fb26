//! CoinGecko market data provider implementation

use crate::{
    constants::{
        COINGECKO_API_KEY_HEADER, COINGECKO_API_URL, COINGECKO_COINS_LIST_ENDPOINT,
        COINGECKO_COINS_MARKETS_ENDPOINT, COINGECKO_GLOBAL_ENDPOINT, MARKETS_PAGE_SIZE,
        REQUEST_TIMEOUT_SECS, USER_AGENT,
    },
    error::ProviderError,
    provider::{sort_by_market_cap_desc, MarketDataProvider},
    types::{CoinListEntry, CoinMarket, GlobalData, GlobalResponse},
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// CoinGecko market data provider
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    /// Creates a new CoinGecko provider
    ///
    /// `COINGECKO_API_URL` overrides the base URL and `COINGECKO_API_KEY`
    /// is sent as the demo API key header when set.
    pub fn new() -> Result<Self, ProviderError> {
        let base_url =
            std::env::var("COINGECKO_API_URL").unwrap_or_else(|_| COINGECKO_API_URL.to_string());
        let api_key = std::env::var("COINGECKO_API_KEY").ok();

        Self::with_base_url(base_url, api_key)
    }

    /// Creates a provider against a custom base URL
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            let value = HeaderValue::from_str(&key)
                .map_err(|e| ProviderError::ApiError(format!("Invalid API key: {}", e)))?;
            headers.insert(COINGECKO_API_KEY_HEADER, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(ProviderError::NetworkError)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Builds the markets URL for one chunk of ids
    fn build_markets_url(&self, ids: &[String], currency: &str) -> String {
        format!(
            "{}{}?vs_currency={}&ids={}&order=market_cap_desc&per_page={}&page=1&sparkline=false",
            self.base_url,
            COINGECKO_COINS_MARKETS_ENDPOINT,
            currency,
            ids.join(","),
            ids.len()
        )
    }

    /// Issues a GET request and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        tracing::debug!(url, "Requesting CoinGecko");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout
            } else {
                ProviderError::NetworkError(e)
            }
        })?;

        // Check for rate limiting
        if response.status().as_u16() == 429 {
            return Err(ProviderError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            return Err(ProviderError::ApiError(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let response_text = response.text().await.map_err(ProviderError::NetworkError)?;
        tracing::debug!(bytes = response_text.len(), "Received CoinGecko response");

        parse_body(&response_text)
    }
}

/// Decodes a response body, keeping a prefix of it in the error
fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| {
        let snippet: String = body.chars().take(200).collect();
        ProviderError::InvalidResponse(format!(
            "Failed to parse CoinGecko response: {}. Response: {}",
            e, snippet
        ))
    })
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    async fn list_coins(&self) -> Result<Vec<CoinListEntry>, ProviderError> {
        let url = format!("{}{}", self.base_url, COINGECKO_COINS_LIST_ENDPOINT);
        let coins: Vec<CoinListEntry> = self.get_json(&url).await?;

        tracing::debug!(count = coins.len(), "Fetched CoinGecko coin list");
        Ok(coins)
    }

    async fn coin_markets(
        &self,
        ids: &[String],
        currency: &str,
    ) -> Result<Vec<CoinMarket>, ProviderError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut markets = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(MARKETS_PAGE_SIZE) {
            let url = self.build_markets_url(chunk, currency);
            let page: Vec<CoinMarket> = self.get_json(&url).await?;
            markets.extend(page);
        }

        // chunks are each sorted; the merged list must be too
        sort_by_market_cap_desc(&mut markets);

        tracing::debug!(
            requested = ids.len(),
            received = markets.len(),
            "Fetched CoinGecko coin markets"
        );
        Ok(markets)
    }

    async fn global(&self) -> Result<GlobalData, ProviderError> {
        let url = format!("{}{}", self.base_url, COINGECKO_GLOBAL_ENDPOINT);
        let response: GlobalResponse = self.get_json(&url).await?;
        Ok(response.data)
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}
