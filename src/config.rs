use std::path::PathBuf;
use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::domain::errors::DomainError;
use crate::infrastructure::order_storage::DEFAULT_ORDERS_KEY;
use crate::infrastructure::user_storage::DEFAULT_USERS_KEY;

/// Rules the order workflow follows. The variants of the original tool
/// differed only in these knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPolicy {
    pub page_size: usize,
    /// Added to the install cost to price a new order.
    pub base_cost: BigDecimal,
    /// New orders must name the client's name, address and phone.
    pub require_client_contact: bool,
    /// Unauthenticated users may place orders under the client's name.
    pub allow_guest_orders: bool,
}

impl Default for OrderPolicy {
    fn default() -> Self {
        Self {
            page_size: 10,
            base_cost: BigDecimal::from(500),
            require_client_contact: false,
            allow_guest_orders: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub orders_key: String,
    pub users_key: String,
    pub policy: OrderPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".furniture-data"),
            orders_key: DEFAULT_ORDERS_KEY.to_string(),
            users_key: DEFAULT_USERS_KEY.to_string(),
            policy: OrderPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let mut policy = defaults.policy;

        if let Some(v) = lookup("PAGE_SIZE") {
            policy.page_size = parse_var("PAGE_SIZE", &v)?;
            if policy.page_size == 0 {
                return Err(DomainError::InvalidInput(
                    "PAGE_SIZE must be at least 1".to_string(),
                ));
            }
        }
        if let Some(v) = lookup("BASE_ORDER_COST") {
            policy.base_cost = parse_var("BASE_ORDER_COST", &v)?;
        }
        if let Some(v) = lookup("REQUIRE_CLIENT_CONTACT") {
            policy.require_client_contact = parse_flag("REQUIRE_CLIENT_CONTACT", &v)?;
        }
        if let Some(v) = lookup("ALLOW_GUEST_ORDERS") {
            policy.allow_guest_orders = parse_flag("ALLOW_GUEST_ORDERS", &v)?;
        }

        Ok(Self {
            data_dir: lookup("ORDERS_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            orders_key: lookup("ORDERS_KEY").unwrap_or(defaults.orders_key),
            users_key: lookup("USERS_KEY").unwrap_or(defaults.users_key),
            policy,
        })
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T, DomainError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| DomainError::InvalidInput(format!("{} must be valid: {}", name, e)))
}

fn parse_flag(name: &str, value: &str) -> Result<bool, DomainError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(DomainError::InvalidInput(format!(
            "{} must be a boolean, got '{}'",
            name, other
        ))),
    }
}
