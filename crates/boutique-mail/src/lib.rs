//! # boutique-mail
//!
//! SMTP delivery for the card-boutique order relay.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use boutique_core::OrderRelay;
//! use boutique_mail::SmtpMailer;
//! use std::sync::Arc;
//!
//! if let Some(mailer) = SmtpMailer::from_env()? {
//!     let from = mailer.from_address().to_string();
//!     let relay = OrderRelay::new(Arc::new(mailer), from, "owner@example.com");
//!     relay.relay(&order).await?;
//! }
//! ```

pub mod config;
pub mod smtp;

// Re-exports
pub use config::MailConfig;
pub use smtp::{build_message, MailError, SmtpMailer};
