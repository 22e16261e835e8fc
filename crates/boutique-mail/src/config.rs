//! # Mail Configuration
//!
//! SMTP relay settings, loaded from environment variables.
//! Mail is optional: without a complete configuration the order relay is
//! disabled while the rest of the storefront keeps working.

use boutique_core::ShopError;
use std::env;
use tracing::warn;

/// SMTP relay configuration
#[derive(Clone)]
pub struct MailConfig {
    /// Relay host (e.g., "smtp.gmail.com")
    pub host: String,

    /// Relay port (465 for implicit TLS, 587 for STARTTLS)
    pub port: u16,

    /// SMTP username
    pub username: String,

    /// SMTP password
    pub password: String,

    /// `true` = implicit TLS, `false` = STARTTLS upgrade
    pub secure: bool,

    /// Sender address (defaults to the SMTP username)
    pub from: String,
}

impl MailConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars (all four, or mail stays disabled):
    /// - `MAIL_HOST`
    /// - `MAIL_PORT`
    /// - `MAIL_USER`
    /// - `MAIL_PASS`
    ///
    /// Optional: `MAIL_SECURE` (`"true"`), `MAIL_FROM`.
    pub fn from_env() -> Result<Option<Self>, ShopError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ShopError> {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let (Some(host), Some(port), Some(username), Some(password)) = (
            get("MAIL_HOST"),
            get("MAIL_PORT"),
            get("MAIL_USER"),
            get("MAIL_PASS"),
        ) else {
            warn!("Email is not fully configured (MAIL_HOST/MAIL_PORT/MAIL_USER/MAIL_PASS).");
            return Ok(None);
        };

        let port = port.parse::<u16>().map_err(|_| {
            ShopError::Configuration(format!("MAIL_PORT must be a port number, got {:?}", port))
        })?;

        let secure = get("MAIL_SECURE").as_deref() == Some("true");
        let from = get("MAIL_FROM").unwrap_or_else(|| username.clone());

        Ok(Some(Self {
            host,
            port,
            username,
            password,
            secure,
            from,
        }))
    }
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("secure", &self.secure)
            .field("from", &self.from)
            .finish()
    }
}
