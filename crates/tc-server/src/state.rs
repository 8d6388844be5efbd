use std::sync::Arc;

use tc_data::{PriceHistoryLoader, PriceHistoryProvider};

use crate::config::ServerConfig;

/// Shared, read-only state handed to every request.
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
    pub loader: PriceHistoryLoader,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Arc<Self> {
        let provider = config.provider.build();
        Self::with_provider(config, provider)
    }

    pub fn with_provider(config: ServerConfig, provider: Arc<dyn PriceHistoryProvider>) -> Arc<Self> {
        Arc::new(Self {
            config,
            loader: PriceHistoryLoader::new(provider),
        })
    }
}
