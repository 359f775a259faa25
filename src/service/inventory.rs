//! Inventory service: the stock-tracking collaborator.
//!
//! A small durable record set with serialized writes. No concurrency
//! hazard beyond that: the interesting part is the side effect, a
//! `stock_update` broadcast after every accepted adjustment.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{EventBus, HubEvent};
use crate::error::HubError;
use crate::persistence::{FileStore, Item};

/// Stock records with broadcast and write-behind mirroring on mutation.
#[derive(Debug)]
pub struct InventoryService {
    items: RwLock<Vec<Item>>,
    event_bus: EventBus,
    store: Arc<FileStore>,
}

impl InventoryService {
    /// Builds the service from the mirrored item list, falling back to
    /// the stock seed when no usable mirror exists.
    pub async fn load(event_bus: EventBus, store: Arc<FileStore>) -> Self {
        let items = match store.load_items().await {
            Ok(Some(items)) => {
                tracing::info!(count = items.len(), "inventory loaded from mirror");
                items
            }
            Ok(None) => seed_items(),
            Err(error) => {
                tracing::warn!(%error, "inventory mirror unreadable, using seed");
                seed_items()
            }
        };
        Self {
            items: RwLock::new(items),
            event_bus,
            store,
        }
    }

    /// Returns a snapshot of all items.
    pub async fn list(&self) -> Vec<Item> {
        self.items.read().await.clone()
    }

    /// Adjusts an item's stock by `delta`, clamping at zero.
    ///
    /// On success the full resulting list is returned, a `stock_update`
    /// is broadcast, and the list is mirrored behind the call.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::ItemNotFound`] when no item has that name.
    pub async fn adjust(&self, name: &str, delta: i64) -> Result<Vec<Item>, HubError> {
        let (snapshot, new_stock) = {
            let mut items = self.items.write().await;
            let item = items
                .iter_mut()
                .find(|item| item.name == name)
                .ok_or_else(|| HubError::ItemNotFound(name.to_string()))?;
            item.stock = item.stock.saturating_add(delta).max(0);
            let new_stock = item.stock;
            (items.clone(), new_stock)
        };

        let _ = self.event_bus.publish(&HubEvent::StockUpdate {
            item: name.to_string(),
            new_stock,
        });
        tracing::info!(item = name, new_stock, "stock adjusted");

        let store = Arc::clone(&self.store);
        let mirror = snapshot.clone();
        tokio::spawn(async move {
            if let Err(error) = store.save_items(&mirror).await {
                tracing::warn!(%error, "inventory mirror write failed");
            }
        });

        Ok(snapshot)
    }
}

/// The stock records the hub starts with when no mirror exists.
fn seed_items() -> Vec<Item> {
    vec![
        Item::new("Laptop", 10),
        Item::new("Keyboard", 15),
        Item::new("Mouse", 5),
    ]
}
