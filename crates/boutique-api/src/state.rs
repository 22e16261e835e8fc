//! # Application State
//!
//! Shared state for the Axum application.
//! Contains configuration, the product store, the token service and the
//! optional order relay. All of it is injected, so tests can swap in a
//! temp-file store and a fake mail transport.

use boutique_core::{
    constant_time_eq, JsonFileStore, OrderRelay, ShopError, SharedProductStore, TokenService,
};
use boutique_mail::SmtpMailer;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

const DEFAULT_JWT_SECRET: &str = "change_this_secret_key";
const DEFAULT_ADMIN_PASSWORD: &str = "change_this_password";

/// Application configuration
#[derive(Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Token signing secret
    pub jwt_secret: String,
    /// Admin login
    pub admin_username: String,
    pub admin_password: String,
    /// Recipient of admin order copies
    pub admin_email: String,
    /// Persisted catalog document
    pub products_file: PathBuf,
    /// Static site root (holds `index.html`)
    pub static_dir: PathBuf,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, ShopError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ShopError> {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(p) => p.parse().map_err(|_| {
                ShopError::Configuration(format!("PORT must be a port number, got {:?}", p))
            })?,
            None => 3000,
        };

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            warn!("JWT_SECRET is not set, using the insecure default signing key");
            DEFAULT_JWT_SECRET.to_string()
        });

        let admin_password = get("ADMIN_PASSWORD").unwrap_or_else(|| {
            warn!("ADMIN_PASSWORD is not set, using the insecure default password");
            DEFAULT_ADMIN_PASSWORD.to_string()
        });

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            environment: get("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            jwt_secret,
            admin_username: get("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string()),
            admin_password,
            admin_email: get("ADMIN_EMAIL").unwrap_or_else(|| "orders@localhost".to_string()),
            products_file: get("PRODUCTS_FILE")
                .unwrap_or_else(|| "products.json".to_string())
                .into(),
            static_dir: get("STATIC_DIR")
                .unwrap_or_else(|| "public".to_string())
                .into(),
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, ShopError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ShopError::Configuration(format!("Invalid socket address: {}", e)))
    }

    /// Check a login attempt against the configured admin credentials
    pub fn admin_credentials_match(&self, username: &str, password: &str) -> bool {
        let user_ok = constant_time_eq(username, &self.admin_username);
        let pass_ok = constant_time_eq(password, &self.admin_password);
        user_ok & pass_ok
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("environment", &self.environment)
            .field("admin_username", &self.admin_username)
            .field("admin_email", &self.admin_email)
            .field("products_file", &self.products_file)
            .field("static_dir", &self.static_dir)
            .finish_non_exhaustive()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application config
    pub config: Arc<AppConfig>,
    /// Product catalog storage
    pub store: SharedProductStore,
    /// Admin token issuing/verification
    pub tokens: TokenService,
    /// Order relay, `None` when mail is not configured
    pub relay: Option<OrderRelay>,
}

impl AppState {
    /// Create state from the environment: JSON file store and SMTP mailer
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let store = Arc::new(JsonFileStore::new(&config.products_file));

        let relay = SmtpMailer::from_env()?.map(|mailer| {
            let from = mailer.from_address().to_string();
            OrderRelay::new(Arc::new(mailer), from, config.admin_email.clone())
        });

        Ok(Self::from_parts(config, store, relay))
    }

    /// Assemble state from already-built parts
    pub fn from_parts(
        config: AppConfig,
        store: SharedProductStore,
        relay: Option<OrderRelay>,
    ) -> Self {
        let tokens = TokenService::new(&config.jwt_secret);
        Self {
            config: Arc::new(config),
            store,
            tokens,
            relay,
        }
    }

    /// Check if the order relay is available
    pub fn mail_enabled(&self) -> bool {
        self.relay.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ShopError> {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        AppConfig::from_lookup(|key| map.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_app_config_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.jwt_secret, DEFAULT_JWT_SECRET);
        assert_eq!(config.admin_username, "admin");
        assert_eq!(config.products_file, PathBuf::from("products.json"));
        assert_eq!(config.environment, "development");
    }

    #[test]
    fn test_invalid_port() {
        assert!(matches!(
            config_from(&[("PORT", "http")]),
            Err(ShopError::Configuration(_))
        ));
    }

    #[test]
    fn test_socket_addr() {
        let config = config_from(&[("HOST", "127.0.0.1"), ("PORT", "8080")]).unwrap();
        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_admin_credentials() {
        let config =
            config_from(&[("ADMIN_USERNAME", "owner"), ("ADMIN_PASSWORD", "s3cret")]).unwrap();
        assert!(config.admin_credentials_match("owner", "s3cret"));
        assert!(!config.admin_credentials_match("owner", "wrong"));
        assert!(!config.admin_credentials_match("admin", "s3cret"));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config =
            config_from(&[("JWT_SECRET", "jwt-xyz"), ("ADMIN_PASSWORD", "pw-xyz")]).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("jwt-xyz"));
        assert!(!debug.contains("pw-xyz"));
    }
}
