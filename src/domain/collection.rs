//! In-memory, validated order set.
//!
//! Storage is kept sorted by `id` so lookups can binary search; queries
//! present results newest first regardless of that order. Expected
//! failures (invalid record, duplicate id, unknown id) are reported as
//! `false` or a rejected list and leave the collection untouched.

use std::collections::HashSet;

use bigdecimal::BigDecimal;

use super::errors::DomainError;
use super::filter::OrderFilter;
use super::order::{Order, OrderUpdate, Statistics};

#[derive(Debug, Clone, Default)]
pub struct OrderCollection {
    orders: Vec<Order>,
}

impl OrderCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from candidate records, returning the ones that
    /// failed validation or collided on `id`.
    pub fn from_records(records: impl IntoIterator<Item = Order>) -> (Self, Vec<Order>) {
        let mut collection = Self::new();
        let rejected = collection.add_all(records);
        (collection, rejected)
    }

    pub fn validate(order: &Order) -> bool {
        order.check().is_ok()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Records in storage order (ascending `id`).
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    fn position(&self, id: &str) -> Result<usize, usize> {
        self.orders.binary_search_by(|o| o.id.as_str().cmp(id))
    }

    pub fn add_order(&mut self, order: Order) -> bool {
        if let Err(e) = order.check() {
            log::debug!("rejecting order '{}': {}", order.id, e);
            return false;
        }
        match self.position(&order.id) {
            Ok(_) => {
                log::debug!("rejecting order '{}': duplicate id", order.id);
                false
            }
            Err(at) => {
                self.orders.insert(at, order);
                true
            }
        }
    }

    /// Returns the `[skip, skip + limit)` window of matching orders, newest
    /// first. Orders with equal timestamps keep their storage order.
    pub fn get_orders(
        &self,
        skip: usize,
        limit: usize,
        filter: &OrderFilter,
    ) -> Result<Vec<Order>, DomainError> {
        filter.validate()?;

        let mut matching: Vec<&Order> = self.orders.iter().filter(|o| filter.matches(o)).collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching
            .into_iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    pub fn count(&self, filter: &OrderFilter) -> Result<usize, DomainError> {
        filter.validate()?;
        Ok(self.orders.iter().filter(|o| filter.matches(o)).count())
    }

    pub fn get_order(&self, id: &str) -> Option<Order> {
        self.position(id).ok().map(|i| self.orders[i].clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_ok()
    }

    /// Merges `updates` onto a copy of the stored record. `id`, `author` and
    /// `created_at` in `updates` are ignored. The stored record is replaced
    /// only if the merged copy is still valid.
    pub fn edit_order(&mut self, id: &str, updates: OrderUpdate) -> bool {
        let Ok(index) = self.position(id) else {
            return false;
        };

        let mut candidate = self.orders[index].clone();
        updates.apply_to(&mut candidate);
        if let Err(e) = candidate.check() {
            log::debug!("rejecting edit of order '{}': {}", id, e);
            return false;
        }

        self.orders[index] = candidate;
        true
    }

    pub fn remove_order(&mut self, id: &str) -> bool {
        match self.position(id) {
            Ok(index) => {
                self.orders.remove(index);
                true
            }
            Err(_) => false,
        }
    }

    /// Inserts every acceptable record and returns the rest, including
    /// records whose `id` repeats an earlier one in the same batch.
    pub fn add_all(&mut self, records: impl IntoIterator<Item = Order>) -> Vec<Order> {
        let mut seen: HashSet<String> = self.orders.iter().map(|o| o.id.clone()).collect();
        let mut rejected = Vec::new();

        for order in records {
            if order.check().is_err() || seen.contains(&order.id) {
                rejected.push(order);
                continue;
            }
            seen.insert(order.id.clone());
            self.orders.push(order);
        }

        self.orders.sort_by(|a, b| a.id.cmp(&b.id));
        if !rejected.is_empty() {
            log::warn!("{} order(s) rejected during bulk insert", rejected.len());
        }
        rejected
    }

    pub fn clear(&mut self) {
        self.orders.clear();
    }

    pub fn get_statistics(&self) -> Statistics {
        let mut stats = Statistics {
            total_orders: self.orders.len(),
            total_cost: BigDecimal::from(0),
            ..Statistics::default()
        };

        for order in &self.orders {
            stats.total_cost += &order.cost;
            *stats.by_status.entry(order.status).or_insert(0) += 1;
            *stats.by_material.entry(order.material.clone()).or_insert(0) += 1;
            *stats.by_type.entry(order.furniture_type.clone()).or_insert(0) += 1;
        }

        stats
    }
}
