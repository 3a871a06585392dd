use serde_json::Value;

use crate::domain::errors::DomainError;
use crate::domain::order::Order;
use crate::domain::ports::{KeyValueStore, OrderStore};

use super::models::OrderRecord;

pub const DEFAULT_ORDERS_KEY: &str = "furnitureOrders";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageInfo {
    pub has_data: bool,
    pub size_bytes: usize,
    pub item_count: usize,
}

/// Serializes the whole order set as a JSON array.
pub fn encode_orders(orders: &[Order]) -> Result<String, DomainError> {
    let records: Vec<OrderRecord> = orders.iter().map(OrderRecord::from).collect();
    Ok(serde_json::to_string(&records)?)
}

/// Result of decoding a stored or imported order array.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedOrders {
    pub orders: Vec<Order>,
    /// Elements that were present but did not decode.
    pub skipped: usize,
}

impl DecodedOrders {
    /// Number of elements in the source array.
    pub fn offered(&self) -> usize {
        self.orders.len() + self.skipped
    }
}

/// Parses a JSON array of orders. A blob that is not an array is an error;
/// individual elements that do not decode are skipped and counted.
pub fn decode_orders_counted(blob: &str) -> Result<DecodedOrders, DomainError> {
    let values: Vec<Value> = serde_json::from_str(blob)?;
    let total = values.len();

    let orders: Vec<Order> = values
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| {
            let decoded = serde_json::from_value::<OrderRecord>(value)
                .map_err(DomainError::from)
                .and_then(Order::try_from);
            match decoded {
                Ok(order) => Some(order),
                Err(e) => {
                    log::warn!("skipping stored order #{}: {}", i, e);
                    None
                }
            }
        })
        .collect();

    if orders.len() != total {
        log::warn!("decoded {} of {} stored orders", orders.len(), total);
    }
    Ok(DecodedOrders {
        skipped: total - orders.len(),
        orders,
    })
}

pub fn decode_orders(blob: &str) -> Result<Vec<Order>, DomainError> {
    Ok(decode_orders_counted(blob)?.orders)
}

/// Order persistence over a single key of a `KeyValueStore`.
pub struct OrderStorage<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> OrderStorage<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn with_default_key(store: S) -> Self {
        Self::new(store, DEFAULT_ORDERS_KEY)
    }

    pub fn clear(&self) -> Result<(), DomainError> {
        self.store.remove(&self.key)
    }

    pub fn has_data(&self) -> Result<bool, DomainError> {
        Ok(self.store.get(&self.key)?.is_some())
    }

    pub fn storage_info(&self) -> Result<StorageInfo, DomainError> {
        match self.store.get(&self.key)? {
            None => Ok(StorageInfo {
                has_data: false,
                size_bytes: 0,
                item_count: 0,
            }),
            Some(data) => {
                let items: Vec<Value> = serde_json::from_str(&data)?;
                Ok(StorageInfo {
                    has_data: true,
                    size_bytes: data.len(),
                    item_count: items.len(),
                })
            }
        }
    }
}

impl<S: KeyValueStore> OrderStore for OrderStorage<S> {
    /// Missing data yields an empty list, as does a blob that cannot be
    /// parsed at all; the latter is logged.
    fn load(&self) -> Result<Vec<Order>, DomainError> {
        let Some(blob) = self.store.get(&self.key)? else {
            return Ok(vec![]);
        };

        match decode_orders(&blob) {
            Ok(orders) => Ok(orders),
            Err(e) => {
                log::error!("stored orders under '{}' are unreadable: {}", self.key, e);
                Ok(vec![])
            }
        }
    }

    fn save(&self, orders: &[Order]) -> Result<(), DomainError> {
        let blob = encode_orders(orders)?;
        self.store.set(&self.key, &blob)?;
        log::debug!("saved {} orders under '{}'", orders.len(), self.key);
        Ok(())
    }
}
