use bigdecimal::BigDecimal;

use super::errors::DomainError;
use super::order::{Order, OrderStatus};

/// Selector value that disables the status / furniture type predicates.
pub const ALL_SENTINEL: &str = "Все";

pub fn is_all_sentinel(value: &str) -> bool {
    let value = value.trim();
    value == ALL_SENTINEL || value.eq_ignore_ascii_case("all")
}

/// AND-combined query predicates for `OrderCollection::get_orders`.
/// Every `None` field matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    /// Case-insensitive substring of the author.
    pub author: Option<String>,
    pub status: Option<OrderStatus>,
    /// Exact match; the "all" sentinel disables it.
    pub furniture_type: Option<String>,
    pub min_cost: Option<BigDecimal>,
    pub max_cost: Option<BigDecimal>,
}

impl OrderFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the status predicate from a selector label, where the "all"
    /// sentinel clears it.
    pub fn with_status_label(mut self, label: &str) -> Result<Self, DomainError> {
        self.status = if is_all_sentinel(label) {
            None
        } else {
            Some(label.parse()?)
        };
        Ok(self)
    }

    pub fn with_furniture_type(mut self, furniture_type: impl Into<String>) -> Self {
        self.furniture_type = Some(furniture_type.into());
        self
    }

    pub fn with_min_cost(mut self, min: BigDecimal) -> Self {
        self.min_cost = Some(min);
        self
    }

    pub fn with_max_cost(mut self, max: BigDecimal) -> Self {
        self.max_cost = Some(max);
        self
    }

    /// Rejects configurations that can only come from a caller bug.
    pub fn validate(&self) -> Result<(), DomainError> {
        let zero = BigDecimal::from(0);
        for (name, bound) in [("min_cost", &self.min_cost), ("max_cost", &self.max_cost)] {
            if let Some(bound) = bound.as_ref().filter(|b| **b < zero) {
                return Err(DomainError::InvalidInput(format!(
                    "{} {} is negative",
                    name, bound
                )));
            }
        }
        if let (Some(min), Some(max)) = (&self.min_cost, &self.max_cost) {
            if min > max {
                return Err(DomainError::InvalidInput(format!(
                    "min_cost {} exceeds max_cost {}",
                    min, max
                )));
            }
        }
        Ok(())
    }

    pub fn matches(&self, order: &Order) -> bool {
        if let Some(author) = self.author.as_deref().filter(|a| !a.is_empty()) {
            if !order
                .author
                .to_lowercase()
                .contains(&author.to_lowercase())
            {
                return false;
            }
        }
        if let Some(status) = self.status {
            if order.status != status {
                return false;
            }
        }
        if let Some(kind) = self
            .furniture_type
            .as_deref()
            .filter(|k| !k.is_empty() && !is_all_sentinel(k))
        {
            if order.furniture_type != kind {
                return false;
            }
        }
        if let Some(min) = &self.min_cost {
            if &order.cost < min {
                return false;
            }
        }
        if let Some(max) = &self.max_cost {
            if &order.cost > max {
                return false;
            }
        }
        true
    }
}
