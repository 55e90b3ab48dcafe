//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the account and invoice services, the API key gate, and
//! configuration.

use anyhow::Context;
use gateway_core::{
    AccountService, AuthGate, InMemoryAccountStore, InMemoryInvoiceStore, InvoiceProcessor,
    InvoiceService, SeededRandom, SharedRandomSource, ThreadRandom,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

/// Default location of the optional config file
pub const DEFAULT_CONFIG_PATH: &str = "config/gateway.toml";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Seed for the invoice processor RNG; unseeded when absent
    pub rng_seed: Option<u64>,
}

/// Values read from `config/gateway.toml`, all optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub environment: Option<String>,
    pub rng_seed: Option<u64>,
}

impl FileConfig {
    /// Read the file if it exists
    pub fn read(path: impl AsRef<Path>) -> anyhow::Result<Option<Self>> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
        };
        let parsed = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(parsed))
    }
}

impl AppConfig {
    /// Load defaults, then `config/gateway.toml` (or `GATEWAY_CONFIG`), then
    /// environment variables (`.env` included).
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let path = std::env::var("GATEWAY_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let file = FileConfig::read(&path)?;
        if file.is_some() {
            tracing::info!("Loaded config from {}", path);
        }

        Self::resolve(file.unwrap_or_default(), |key| std::env::var(key).ok())
    }

    /// Merge file values and environment lookups over the defaults
    pub fn resolve(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let mut config = Self {
            host: file.host.unwrap_or_else(|| "127.0.0.1".to_string()),
            port: file.port.unwrap_or(8080),
            environment: file.environment.unwrap_or_else(|| "development".to_string()),
            rng_seed: file.rng_seed,
        };

        if let Some(host) = env("HOST") {
            config.host = host;
        }
        if let Some(port) = env("PORT") {
            config.port = port.parse().with_context(|| format!("Invalid PORT: {}", port))?;
        }
        if let Some(environment) = env("ENVIRONMENT") {
            config.environment = environment;
        }
        if let Some(seed) = env("GATEWAY_RNG_SEED") {
            config.rng_seed = Some(
                seed.parse()
                    .with_context(|| format!("Invalid GATEWAY_RNG_SEED: {}", seed))?,
            );
        }

        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    fn random_source(&self) -> SharedRandomSource {
        match self.rng_seed {
            Some(seed) => Arc::new(SeededRandom::new(seed)),
            None => Arc::new(ThreadRandom),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            rng_seed: None,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Account registration and lookup
    pub accounts: AccountService,
    /// Account-scoped invoice operations
    pub invoices: InvoiceService,
    /// API key gate for invoice routes
    pub gate: AuthGate,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// In-memory state with the random source chosen by `config`
    pub fn new(config: AppConfig) -> Self {
        let source = config.random_source();
        Self::with_random_source(config, source)
    }

    /// In-memory state with an explicit random source
    pub fn with_random_source(config: AppConfig, source: SharedRandomSource) -> Self {
        let accounts = AccountService::new(Arc::new(InMemoryAccountStore::new()));
        let invoices = InvoiceService::new(
            Arc::new(InMemoryInvoiceStore::new()),
            InvoiceProcessor::new(source),
        );
        let gate = AuthGate::new(accounts.clone());

        Self {
            accounts,
            invoices,
            gate,
            config,
        }
    }
}
