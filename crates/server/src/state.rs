use archivestream_core::{Config, Resolver, SanitizedConfig};
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    config: Config,
    resolver: Arc<Resolver>,
}

impl AppState {
    pub fn new(config: Config, resolver: Arc<Resolver>) -> Self {
        Self { config, resolver }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn resolver(&self) -> &Resolver {
        self.resolver.as_ref()
    }
}
