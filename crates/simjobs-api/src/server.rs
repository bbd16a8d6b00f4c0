//! Interface server implementation.

use std::future::Future;
use std::sync::Arc;

use simjobs_config::{Config, CorsConfig};
use tokio::net::TcpListener;
use tracing::info;

use crate::http::routes::create_app;
use crate::state::AppState;

/// Interface server configuration.
#[derive(Debug, Clone)]
pub struct InterfaceConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

impl InterfaceConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            cors: CorsConfig::default(),
        }
    }

    /// Set the CORS policy.
    pub fn with_cors(mut self, cors: CorsConfig) -> Self {
        self.cors = cors;
        self
    }
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", 8000)
    }
}

impl From<&Config> for InterfaceConfig {
    fn from(config: &Config) -> Self {
        Self::new(config.server.host.clone(), config.server.port).with_cors(config.cors.clone())
    }
}

/// The interface server.
pub struct InterfaceServer {
    config: InterfaceConfig,
    state: Arc<AppState>,
}

impl InterfaceServer {
    pub fn new(config: InterfaceConfig, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    /// Get the server address.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Serve until `shutdown` resolves, then finish in-flight requests.
    pub async fn run<F>(&self, shutdown: F) -> Result<(), Box<dyn std::error::Error>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = create_app(self.state.clone(), &self.config.cors)?;

        let listener = TcpListener::bind(self.addr()).await?;
        info!("Interface server listening on {}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Interface server stopped");
        Ok(())
    }
}
