//! Registration and update service
//!
//! Lifecycle:
//!
//! ```text
//! CoinGeckoPlugin::init
//!     ↓
//! Configure   settings → ResolvedConfig (currency, frozen coin ids)
//!     ↓
//! Register    metric type + category + definitions, first value push
//!     ↓
//! Scheduler   MetricUpdater::tick every update_frequency (after 5s)
//! ```

use crate::{
    catalog::{coin_values, define_coin_metrics, define_global_metrics, global_values},
    config::ResolvedConfig,
    constants::{CATEGORY_GLOBAL_ID, INITIAL_DELAY, TYPE_CURRENCY_ID},
    error::PluginError,
    host::MetricHost,
    provider::MarketDataProvider,
    scheduler::{ScheduledFn, ScheduledTask, Scheduler},
    settings::PluginSettings,
    types::{Category, CoinMarket, GlobalData, Item, MetricType, Unit, ValueType},
};
use futures::FutureExt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::Instrument;
use uuid::Uuid;

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Values were pushed to the host
    Updated { values: usize },
    /// Another tick was still running
    Skipped,
}

/// Fetches snapshots and publishes them for a fixed configuration
pub struct MetricUpdater {
    provider: Arc<dyn MarketDataProvider>,
    host: Arc<dyn MetricHost>,
    config: Arc<ResolvedConfig>,
    in_flight: Mutex<()>,
}

impl MetricUpdater {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        host: Arc<dyn MetricHost>,
        config: ResolvedConfig,
    ) -> Self {
        Self {
            provider,
            host,
            config: Arc::new(config),
            in_flight: Mutex::new(()),
        }
    }

    /// Currency type and global category
    fn common_items(&self) -> Vec<Item> {
        let currency = &self.config.currency;
        vec![
            Item::MetricType(MetricType {
                id: TYPE_CURRENCY_ID.to_string(),
                label: currency.to_uppercase(),
                value_type: ValueType::Numeric,
                base_unit: Unit {
                    label: currency.to_uppercase(),
                    abbreviation: self.config.currency_symbol.to_string(),
                },
            }),
            Item::Category(Category {
                id: CATEGORY_GLOBAL_ID.to_string(),
                label: "Global".to_string(),
                description: "Global cryptocurrency market".to_string(),
            }),
        ]
    }

    /// Registers the catalog once and pushes the first values
    ///
    /// Coins are registered from the snapshots the API returns; an id that
    /// yields no snapshot gets no metrics.
    ///
    /// # Errors
    /// `PluginError::Dependency` if a snapshot fetch fails; nothing is
    /// registered in that case.
    pub async fn register(&self) -> Result<usize, PluginError> {
        let _guard = self.in_flight.lock().await;
        let (global, markets) = self.fetch().await?;

        let mut items = self.common_items();
        items.extend(
            define_global_metrics(TYPE_CURRENCY_ID)
                .into_iter()
                .map(Item::Metric),
        );
        for market in &markets {
            items.extend(
                define_coin_metrics(&market.id, &market.name, TYPE_CURRENCY_ID)
                    .into_iter()
                    .map(Item::Metric),
            );
        }

        tracing::info!(
            items = items.len(),
            coins = markets.len(),
            "Registering metrics"
        );
        self.host.register(items).await;

        Ok(self.publish(&global, &markets).await)
    }

    /// Refreshes all values
    ///
    /// A tick that starts while another is still running is skipped.
    ///
    /// # Errors
    /// `PluginError::Dependency` if a snapshot fetch fails; no values are
    /// pushed in that case.
    pub async fn tick(&self) -> Result<TickOutcome, PluginError> {
        let span = tracing::info_span!("tick", tick_id = %Uuid::new_v4());
        self.run_tick().instrument(span).await
    }

    async fn run_tick(&self) -> Result<TickOutcome, PluginError> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::warn!("Previous update still running, skipping tick");
            return Ok(TickOutcome::Skipped);
        };

        let (global, markets) = self.fetch().await?;
        let values = self.publish(&global, &markets).await;

        tracing::debug!(values, "Updated metric values");
        Ok(TickOutcome::Updated { values })
    }

    /// Fetches the global snapshot and the coin snapshots concurrently
    async fn fetch(&self) -> Result<(GlobalData, Vec<CoinMarket>), PluginError> {
        let global = async {
            self.provider
                .global()
                .await
                .map_err(|e| PluginError::dependency("global", e))
        };
        let markets = async {
            if self.config.coin_ids.is_empty() {
                return Ok(Vec::new());
            }
            self.provider
                .coin_markets(&self.config.coin_ids, &self.config.currency)
                .await
                .map_err(|e| PluginError::dependency("coin markets", e))
        };

        tokio::try_join!(global, markets)
    }

    async fn publish(&self, global: &GlobalData, markets: &[CoinMarket]) -> usize {
        let mut values = global_values(global, &self.config.currency);
        for market in markets {
            values.extend(coin_values(market));
        }

        let count = values.len();
        self.host.update_values(values).await;
        count
    }
}

/// Plugin entry point wiring provider, host and scheduler together
pub struct CoinGeckoPlugin {
    provider: Arc<dyn MarketDataProvider>,
    host: Arc<dyn MetricHost>,
    scheduler: Arc<dyn Scheduler>,
    updater: Option<Arc<MetricUpdater>>,
    task: Option<ScheduledTask>,
}

impl CoinGeckoPlugin {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        host: Arc<dyn MetricHost>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            provider,
            host,
            scheduler,
            updater: None,
            task: None,
        }
    }

    /// Configures, registers and arms the recurring update
    ///
    /// Calling `init` again disposes the previous schedule first.
    ///
    /// # Errors
    /// Any configuration or dependency error; the plugin is not started.
    pub async fn init(&mut self, settings: &PluginSettings) -> Result<(), PluginError> {
        self.dispose();

        let config = ResolvedConfig::resolve(settings, self.provider.as_ref()).await?;
        let update_frequency = config.update_frequency;

        let updater = Arc::new(MetricUpdater::new(
            self.provider.clone(),
            self.host.clone(),
            config,
        ));
        updater.register().await?;

        let tick_updater = updater.clone();
        let task: ScheduledFn = Arc::new(move || {
            let updater = tick_updater.clone();
            async move { updater.tick().await.map(|_| ()) }.boxed()
        });

        self.task = Some(self.scheduler.interval(task, update_frequency, INITIAL_DELAY));
        self.updater = Some(updater);

        tracing::info!(
            provider = self.provider.provider_name(),
            "CoinGecko plugin initialized"
        );
        Ok(())
    }

    /// Updater of the running plugin
    pub fn updater(&self) -> Option<&Arc<MetricUpdater>> {
        self.updater.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Stops the recurring update
    pub fn dispose(&mut self) {
        if let Some(task) = self.task.take() {
            task.cancel();
            tracing::info!("CoinGecko plugin disposed");
        }
        self.updater = None;
    }
}

impl Drop for CoinGeckoPlugin {
    fn drop(&mut self) {
        self.dispose();
    }
}
