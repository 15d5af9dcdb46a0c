pub mod config;
pub mod models;
pub mod store;

pub use config::Config;
pub use models::*;
pub use store::{DatasetStore, MemoryStore, RedisStore, StoreError};
