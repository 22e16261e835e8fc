//! # SMTP Transport
//!
//! `MailTransport` implementation on top of lettre's async SMTP client.
//! The underlying connection pool is created once and reused for every
//! message.

use crate::config::MailConfig;
use async_trait::async_trait;
use boutique_core::{MailMessage, MailTransport, ShopError, ShopResult};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;
use tracing::{debug, instrument};

/// Failures while building or delivering a message
#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address {address:?}: {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("could not build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

impl From<MailError> for ShopError {
    fn from(err: MailError) -> Self {
        ShopError::ServiceUnavailable(err.to_string())
    }
}

/// SMTP mailer shared by all order requests
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    /// Build the transport from `config`. No connection is opened yet.
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let builder = if config.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
        };

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }

    /// Load `MailConfig` from the environment and build a mailer.
    ///
    /// Returns `Ok(None)` when mail is not configured.
    pub fn from_env() -> ShopResult<Option<Self>> {
        match MailConfig::from_env()? {
            Some(config) => Ok(Some(Self::new(&config)?)),
            None => Ok(None),
        }
    }

    /// Sender address used for outgoing mail
    pub fn from_address(&self) -> &str {
        &self.from
    }
}

/// Convert a `MailMessage` into a lettre message
pub fn build_message(message: &MailMessage) -> Result<Message, MailError> {
    let parse = |address: &str| {
        address.parse::<Mailbox>().map_err(|source| MailError::Address {
            address: address.to_string(),
            source,
        })
    };

    Ok(Message::builder()
        .from(parse(&message.from)?)
        .to(parse(&message.to)?)
        .subject(message.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(message.text.clone())?)
}

#[async_trait]
impl MailTransport for SmtpMailer {
    #[instrument(skip(self, message), fields(to = %message.to))]
    async fn send(&self, message: &MailMessage) -> ShopResult<()> {
        let email = build_message(message)?;
        self.transport.send(email).await.map_err(MailError::from)?;
        debug!("Sent \"{}\"", message.subject);
        Ok(())
    }

    fn transport_name(&self) -> &'static str {
        "smtp"
    }
}
