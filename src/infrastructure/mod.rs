pub mod kv_store;
pub mod models;
pub mod order_storage;
pub mod seed;
pub mod user_storage;
