//! Service container for dependency injection

use super::traits::{ConfigProvider, Transport};
use crate::config::Config;
use crate::core::UpdaterResult;
use crate::http::HttpTransport;
use std::sync::Arc;

/// Holds the configuration and the shared transport as trait objects.
///
/// Every dependency registered from one container downloads through the
/// same [`Transport`], so cookies and connection reuse carry across them.
#[derive(Clone)]
pub struct ServiceContainer {
    pub config: Arc<dyn ConfigProvider>,
    pub transport: Arc<dyn Transport>,
}

impl ServiceContainer {
    /// Load config from disk and build the production transport
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read, created or
    /// validated, or if the HTTP client cannot be built.
    pub fn load() -> UpdaterResult<Self> {
        Self::new(Config::load()?)
    }

    /// Build the production transport for an already loaded config
    pub fn new(config: Config) -> UpdaterResult<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
        })
    }

    /// Create a service container with custom provider implementations
    ///
    /// This is primarily useful for testing, where mocks stand in for the
    /// config file and the network.
    pub fn with_providers(config: Arc<dyn ConfigProvider>, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Get the configuration provider
    pub fn config(&self) -> &dyn ConfigProvider {
        self.config.as_ref()
    }

    /// Get a handle to the shared transport
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }
}
