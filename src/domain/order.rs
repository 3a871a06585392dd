use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use super::errors::DomainError;

/// Upper bound on `Order::description`, counted in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// Workflow position of an order. The labels are the workshop's own
/// wording and are what gets persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OrderStatus {
    Queued,
    InProgress,
    Completed,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Queued,
        OrderStatus::InProgress,
        OrderStatus::Completed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Queued => "в очереди",
            OrderStatus::InProgress => "в работе",
            OrderStatus::Completed => "завершен",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    /// Accepts the persisted labels as well as the ASCII aliases used on
    /// the command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "в очереди" | "queued" => Ok(OrderStatus::Queued),
            "в работе" | "in-progress" => Ok(OrderStatus::InProgress),
            "завершен" | "completed" => Ok(OrderStatus::Completed),
            other => Err(DomainError::InvalidInput(format!(
                "unknown order status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    pub description: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub cost: BigDecimal,
    pub install_cost: BigDecimal,
    pub material: String,
    pub furniture_type: String,
    pub size: String,
    pub quantity: u32,
    pub client_name: String,
    pub client_address: String,
    pub client_phone: String,
    pub payment_method: String,
    pub prepayment_percent: u8,
    pub photo_link: String,
}

impl Order {
    /// Checks the record-local invariants. Uniqueness of `id` is a
    /// collection concern and is not looked at here.
    pub fn check(&self) -> Result<(), DomainError> {
        if self.id.is_empty() {
            return Err(DomainError::InvalidInput("id is empty".to_string()));
        }
        if self.description.is_empty() {
            return Err(DomainError::InvalidInput(
                "description is empty".to_string(),
            ));
        }
        let chars = self.description.chars().count();
        if chars > MAX_DESCRIPTION_CHARS {
            return Err(DomainError::InvalidInput(format!(
                "description has {} characters, at most {} allowed",
                chars, MAX_DESCRIPTION_CHARS
            )));
        }
        if self.author.trim().is_empty() {
            return Err(DomainError::InvalidInput("author is blank".to_string()));
        }
        if self.cost < BigDecimal::from(0) {
            return Err(DomainError::InvalidInput(format!(
                "cost {} is negative",
                self.cost
            )));
        }
        Ok(())
    }

    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completed
    }
}

/// Partial update for `OrderCollection::edit_order`.
///
/// `id`, `author` and `created_at` may be filled in by callers but are
/// always discarded on merge.
#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub id: Option<String>,
    pub author: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub status: Option<OrderStatus>,
    pub cost: Option<BigDecimal>,
    pub install_cost: Option<BigDecimal>,
    pub material: Option<String>,
    pub furniture_type: Option<String>,
    pub size: Option<String>,
    pub quantity: Option<u32>,
    pub client_name: Option<String>,
    pub client_address: Option<String>,
    pub client_phone: Option<String>,
    pub payment_method: Option<String>,
    pub prepayment_percent: Option<u8>,
    pub photo_link: Option<String>,
}

impl OrderUpdate {
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub(crate) fn apply_to(self, order: &mut Order) {
        let OrderUpdate {
            id: _,
            author: _,
            created_at: _,
            description,
            status,
            cost,
            install_cost,
            material,
            furniture_type,
            size,
            quantity,
            client_name,
            client_address,
            client_phone,
            payment_method,
            prepayment_percent,
            photo_link,
        } = self;

        if let Some(v) = description {
            order.description = v;
        }
        if let Some(v) = status {
            order.status = v;
        }
        if let Some(v) = cost {
            order.cost = v;
        }
        if let Some(v) = install_cost {
            order.install_cost = v;
        }
        if let Some(v) = material {
            order.material = v;
        }
        if let Some(v) = furniture_type {
            order.furniture_type = v;
        }
        if let Some(v) = size {
            order.size = v;
        }
        if let Some(v) = quantity {
            order.quantity = v;
        }
        if let Some(v) = client_name {
            order.client_name = v;
        }
        if let Some(v) = client_address {
            order.client_address = v;
        }
        if let Some(v) = client_phone {
            order.client_phone = v;
        }
        if let Some(v) = payment_method {
            order.payment_method = v;
        }
        if let Some(v) = prepayment_percent {
            order.prepayment_percent = v;
        }
        if let Some(v) = photo_link {
            order.photo_link = v;
        }
    }
}

/// Collection-wide aggregates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statistics {
    pub total_orders: usize,
    pub total_cost: BigDecimal,
    pub by_status: BTreeMap<OrderStatus, usize>,
    pub by_material: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
}
