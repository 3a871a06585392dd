use crate::domain::errors::DomainError;
use crate::domain::ports::{KeyValueStore, UserDirectory};
use crate::domain::user::UserAccount;

use super::models::UserRecord;

pub const DEFAULT_USERS_KEY: &str = "furnitureUsers";

pub struct UserStorage<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> UserStorage<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn with_default_key(store: S) -> Self {
        Self::new(store, DEFAULT_USERS_KEY)
    }
}

impl<S: KeyValueStore> UserDirectory for UserStorage<S> {
    fn load_users(&self) -> Result<Option<Vec<UserAccount>>, DomainError> {
        let Some(blob) = self.store.get(&self.key)? else {
            return Ok(None);
        };
        let records: Vec<UserRecord> = serde_json::from_str(&blob)?;
        let accounts = records
            .into_iter()
            .map(UserAccount::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(accounts))
    }

    fn save_users(&self, users: &[UserAccount]) -> Result<(), DomainError> {
        let records: Vec<UserRecord> = users.iter().map(UserRecord::from).collect();
        self.store.set(&self.key, &serde_json::to_string(&records)?)
    }
}
