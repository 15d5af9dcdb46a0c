use std::sync::Arc;

use candlemark_rs::workbench::Workbench;
use shared::{Config, DatasetStore, MemoryStore, RedisStore};
use tokio::sync::Mutex;

use crate::services::gemini::GeminiClient;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DatasetStore>,
    pub gemini: Option<Arc<GeminiClient>>,
    /// Single-threaded labeling state. The lock is taken for synchronous
    /// transitions only and never held across an await.
    pub workbench: Arc<Mutex<Workbench>>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, anyhow::Error> {
        let store: Arc<dyn DatasetStore> = match config.store_backend.as_str() {
            "redis" => {
                tracing::info!("using redis dataset store at {}", config.redis_url);
                Arc::new(RedisStore::new(&config.redis_url)?)
            }
            _ => {
                tracing::info!("using in-memory dataset store");
                Arc::new(MemoryStore::new())
            }
        };

        let gemini = match &config.gemini_api_key {
            Some(key) => Some(Arc::new(GeminiClient::with_config(
                key.clone(),
                config.gemini_model.clone(),
                config.gemini_base_url.clone(),
                config.llm_timeout_secs,
            )?)),
            None => {
                tracing::warn!("GEMINI_API_KEY not set; LLM flows disabled");
                None
            }
        };

        Ok(AppState {
            store,
            gemini,
            workbench: Arc::new(Mutex::new(Workbench::new())),
        })
    }
}
