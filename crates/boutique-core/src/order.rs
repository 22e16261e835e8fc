//! # Order Relay
//!
//! Customer order requests are not stored. They are validated, turned into
//! two notification emails (one to the shop admin, one acknowledgment to the
//! customer) and handed to a `MailTransport`.

use crate::error::{ShopError, ShopResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Shop name used to sign customer acknowledgments
pub const SHOP_SIGNATURE: &str = "Card Boutique";

pub const ADMIN_SUBJECT: &str = "New card order request from your website";
pub const CUSTOMER_SUBJECT: &str = "We received your card order request";

/// An order request as submitted by a customer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub card_type: Option<String>,
    /// Only positive quantities are kept
    pub quantity: Option<f64>,
    pub message: String,
}

impl OrderRequest {
    /// Name, email and message must be present
    pub fn validate(&self) -> ShopResult<()> {
        if self.name.is_empty() || self.email.is_empty() || self.message.is_empty() {
            return Err(ShopError::Validation(
                "Name, email, and order details are required.".to_string(),
            ));
        }
        Ok(())
    }

    fn safe_quantity(&self) -> Option<f64> {
        self.quantity.filter(|q| *q > 0.0)
    }

    /// Lines describing the order, shared by both notifications
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Name: {}", self.name),
            format!("Email: {}", self.email),
        ];
        if let Some(phone) = self.phone.as_deref().filter(|p| !p.is_empty()) {
            lines.push(format!("Phone: {}", phone));
        }
        if let Some(card_type) = self.card_type.as_deref().filter(|c| !c.is_empty()) {
            lines.push(format!("Card type: {}", card_type));
        }
        if let Some(quantity) = self.safe_quantity() {
            lines.push(format!("Quantity: {}", quantity));
        }
        lines.push(String::new());
        lines.push("Order details:".to_string());
        lines.push(self.message.clone());
        lines
    }
}

/// A plain-text email ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

/// Outbound mail capability.
///
/// The SMTP implementation lives in `boutique-mail`; tests substitute a
/// recording fake.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &MailMessage) -> ShopResult<()>;

    /// Transport name (for logging)
    fn transport_name(&self) -> &'static str {
        "mail"
    }
}

/// Type alias for a shared transport (dynamic dispatch)
pub type BoxedMailTransport = Arc<dyn MailTransport>;

/// Builds and dispatches the two notifications for an order
#[derive(Clone)]
pub struct OrderRelay {
    transport: BoxedMailTransport,
    from: String,
    admin_email: String,
}

impl OrderRelay {
    pub fn new(
        transport: BoxedMailTransport,
        from: impl Into<String>,
        admin_email: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            from: from.into(),
            admin_email: admin_email.into(),
        }
    }

    /// Copy of the order for the shop admin
    pub fn admin_message(&self, order: &OrderRequest) -> MailMessage {
        MailMessage {
            from: self.from.clone(),
            to: self.admin_email.clone(),
            subject: ADMIN_SUBJECT.to_string(),
            text: order.summary_lines().join("\n"),
        }
    }

    /// Acknowledgment sent back to the customer
    pub fn customer_message(&self, order: &OrderRequest) -> MailMessage {
        let mut lines = vec![
            format!("Hi {},", order.name),
            String::new(),
            "Thank you for reaching out about your card order. Here is a copy of what you sent us:"
                .to_string(),
            String::new(),
        ];
        lines.extend(order.summary_lines());
        lines.extend([
            String::new(),
            "We will review your request and get back to you as soon as possible with options, pricing, and next steps."
                .to_string(),
            String::new(),
            "Best regards,".to_string(),
            SHOP_SIGNATURE.to_string(),
        ]);

        MailMessage {
            from: self.from.clone(),
            to: order.email.clone(),
            subject: CUSTOMER_SUBJECT.to_string(),
            text: lines.join("\n"),
        }
    }

    /// Validate `order` and send both notifications concurrently.
    ///
    /// A failure of either message fails the whole relay.
    #[instrument(skip(self, order), fields(transport = self.transport.transport_name()))]
    pub async fn relay(&self, order: &OrderRequest) -> ShopResult<()> {
        order.validate()?;

        let admin = self.admin_message(order);
        let customer = self.customer_message(order);

        tokio::try_join!(self.transport.send(&admin), self.transport.send(&customer)).map_err(
            |e| {
                error!("Error sending order emails: {}", e);
                ShopError::ServiceUnavailable(
                    "We could not send emails right now. Please try again later or contact us directly."
                        .to_string(),
                )
            },
        )?;

        info!("Relayed order from {}", order.email);
        Ok(())
    }
}

impl std::fmt::Debug for OrderRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderRelay")
            .field("transport", &self.transport.transport_name())
            .field("from", &self.from)
            .field("admin_email", &self.admin_email)
            .finish()
    }
}
