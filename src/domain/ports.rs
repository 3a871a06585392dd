use super::errors::DomainError;
use super::order::Order;
use super::user::UserAccount;

/// String blobs addressed by key, the shape of the browser's local storage.
pub trait KeyValueStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, DomainError>;
    fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;
    fn remove(&self, key: &str) -> Result<(), DomainError>;
}

/// Whole-snapshot persistence for the order collection. `save` always
/// receives the full record set, never a delta.
pub trait OrderStore: Send + Sync + 'static {
    fn load(&self) -> Result<Vec<Order>, DomainError>;
    fn save(&self, orders: &[Order]) -> Result<(), DomainError>;
}

pub trait UserDirectory: Send + Sync + 'static {
    /// `None` when no user list has ever been written.
    fn load_users(&self) -> Result<Option<Vec<UserAccount>>, DomainError>;
    fn save_users(&self, users: &[UserAccount]) -> Result<(), DomainError>;
}
