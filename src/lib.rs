pub mod application;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;

use application::auth_service::AuthService;
use application::order_service::OrderService;
use domain::errors::DomainError;
use domain::ports::KeyValueStore;
use infrastructure::kv_store::FileKeyValueStore;
use infrastructure::order_storage::OrderStorage;
use infrastructure::seed::seed_orders;
use infrastructure::user_storage::UserStorage;

pub use config::{AppConfig, OrderPolicy};
pub use domain::collection::OrderCollection;

/// Order and user services sharing one key-value store.
pub struct App<S> {
    pub orders: OrderService<OrderStorage<S>>,
    pub auth: AuthService<UserStorage<S>>,
}

impl<S: KeyValueStore + Clone> App<S> {
    /// Loads (or seeds) orders and users from `store`.
    pub fn open(store: S, config: &AppConfig) -> Result<Self, DomainError> {
        let orders = OrderService::bootstrap(
            OrderStorage::new(store.clone(), config.orders_key.clone()),
            config.policy.clone(),
            seed_orders(),
        )?;
        let auth = AuthService::new(UserStorage::new(store, config.users_key.clone()))?;
        Ok(Self { orders, auth })
    }
}

/// Opens the application on the directory named by `config.data_dir`.
pub fn build_app(config: &AppConfig) -> Result<App<FileKeyValueStore>, DomainError> {
    let store = FileKeyValueStore::open(config.data_dir.clone())?;
    log::info!("using data directory {}", store.root().display());
    App::open(store, config)
}
