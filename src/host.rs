//! Monitoring host abstraction and an in-memory implementation

use crate::types::{Item, MetricValue};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Receiver of catalog items and metric values
///
/// The host owns the metric store; the plugin never reads values back.
#[async_trait]
pub trait MetricHost: Send + Sync {
    /// Registers types, categories and metric definitions
    async fn register(&self, items: Vec<Item>);

    /// Overwrites the values of previously registered metrics
    async fn update_values(&self, values: Vec<MetricValue>);
}

/// In-memory host keeping the registered catalog and latest value per metric
///
/// Used by the local harness and tests.
pub struct InMemoryHost {
    items: Arc<RwLock<Vec<Item>>>,
    values: Arc<RwLock<HashMap<String, MetricValue>>>,
    update_batches: Arc<RwLock<usize>>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
            values: Arc::new(RwLock::new(HashMap::new())),
            update_batches: Arc::new(RwLock::new(0)),
        }
    }

    /// All registered items, in registration order
    pub async fn items(&self) -> Vec<Item> {
        self.items.read().await.clone()
    }

    /// Latest value of a metric
    pub async fn value(&self, id: &str) -> Option<MetricValue> {
        self.values.read().await.get(id).cloned()
    }

    /// Latest value of every metric that has received one
    pub async fn values(&self) -> HashMap<String, MetricValue> {
        self.values.read().await.clone()
    }

    /// Number of `update_values` calls received
    pub async fn update_batches(&self) -> usize {
        *self.update_batches.read().await
    }
}

impl Default for InMemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricHost for InMemoryHost {
    async fn register(&self, items: Vec<Item>) {
        let mut registered = self.items.write().await;
        for item in items {
            // re-registering an id replaces the earlier item
            match registered.iter_mut().find(|i| i.id() == item.id()) {
                Some(existing) => *existing = item,
                None => registered.push(item),
            }
        }
        tracing::debug!(total = registered.len(), "Registered items");
    }

    async fn update_values(&self, values: Vec<MetricValue>) {
        let known: Vec<String> = self
            .items
            .read()
            .await
            .iter()
            .filter_map(|i| match i {
                Item::Metric(m) => Some(m.id.clone()),
                _ => None,
            })
            .collect();

        {
            let mut batches = self.update_batches.write().await;
            *batches += 1;
        }

        let mut slots = self.values.write().await;
        for value in values {
            if !known.contains(&value.id) {
                tracing::warn!(id = %value.id, "Dropping value for unregistered metric");
                continue;
            }
            slots.insert(value.id.clone(), value);
        }
    }
}
