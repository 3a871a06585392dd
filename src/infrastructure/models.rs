use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::order::Order;
use crate::domain::user::{User, UserAccount};

/// Persisted shape of an order: a camelCase JSON object with `createdAt` as
/// an ISO-8601 string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: String,
    pub description: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub status: String,
    #[serde(with = "money")]
    pub cost: BigDecimal,
    #[serde(default, with = "money")]
    pub install_cost: BigDecimal,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub furniture_type: String,
    #[serde(default)]
    pub size: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_address: String,
    #[serde(default)]
    pub client_phone: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub prepayment_percent: u8,
    #[serde(default)]
    pub photo_link: String,
}

fn default_quantity() -> u32 {
    1
}

/// Amounts are written as JSON numbers. Reading also accepts numeric
/// strings, which older blobs may contain.
mod money {
    use bigdecimal::BigDecimal;
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::{Number, Value};

    pub fn serialize<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
        let number: Number = value.to_string().parse().map_err(S::Error::custom)?;
        number.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
        let text = match Value::deserialize(deserializer)? {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s,
            other => return Err(D::Error::custom(format!("expected an amount, got {}", other))),
        };
        text.trim().parse().map_err(D::Error::custom)
    }
}

impl From<&Order> for OrderRecord {
    fn from(o: &Order) -> Self {
        OrderRecord {
            id: o.id.clone(),
            description: o.description.clone(),
            author: o.author.clone(),
            created_at: o.created_at,
            status: o.status.label().to_string(),
            cost: o.cost.clone(),
            install_cost: o.install_cost.clone(),
            material: o.material.clone(),
            furniture_type: o.furniture_type.clone(),
            size: o.size.clone(),
            quantity: o.quantity,
            client_name: o.client_name.clone(),
            client_address: o.client_address.clone(),
            client_phone: o.client_phone.clone(),
            payment_method: o.payment_method.clone(),
            prepayment_percent: o.prepayment_percent,
            photo_link: o.photo_link.clone(),
        }
    }
}

impl TryFrom<OrderRecord> for Order {
    type Error = DomainError;

    fn try_from(r: OrderRecord) -> Result<Self, Self::Error> {
        Ok(Order {
            status: r.status.parse()?,
            id: r.id,
            description: r.description,
            author: r.author,
            created_at: r.created_at,
            cost: r.cost,
            install_cost: r.install_cost,
            material: r.material,
            furniture_type: r.furniture_type,
            size: r.size,
            quantity: r.quantity,
            client_name: r.client_name,
            client_address: r.client_address,
            client_phone: r.client_phone,
            payment_method: r.payment_method,
            prepayment_percent: r.prepayment_percent,
            photo_link: r.photo_link,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub password: String,
    pub role: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl From<&UserAccount> for UserRecord {
    fn from(a: &UserAccount) -> Self {
        UserRecord {
            id: a.user.id.clone(),
            username: a.user.username.clone(),
            password: a.password.clone(),
            role: a.user.role.as_str().to_string(),
            name: a.user.name.clone(),
            email: a.user.email.clone(),
        }
    }
}

impl TryFrom<UserRecord> for UserAccount {
    type Error = DomainError;

    fn try_from(r: UserRecord) -> Result<Self, Self::Error> {
        Ok(UserAccount {
            user: User {
                role: r.role.parse()?,
                id: r.id,
                username: r.username,
                name: r.name,
                email: r.email,
            },
            password: r.password,
        })
    }
}
