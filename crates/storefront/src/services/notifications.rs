//! Order notification emails.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates. Delivery is
//! best-effort: callers log failures and carry on, an unreachable SMTP relay
//! must never undo a placed order.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;
use crate::models::Order;

/// Merchant inbox that receives a copy of every order.
const MERCHANT_RECIPIENT: &str = "orders@velourmaison.com";

/// Delivery window quoted in the confirmation email.
const DELIVERY_ESTIMATE: &str = "3-5 business days";

/// One order line as rendered in email bodies.
struct ItemView {
    name: String,
    quantity: u32,
    price: String,
    line_total: String,
}

/// HTML template for the customer confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.html")]
struct OrderConfirmationHtml<'a> {
    name: &'a str,
    order_id: String,
    items: &'a [ItemView],
    total: String,
    shipping_address: String,
    delivery_estimate: &'a str,
}

/// Plain text template for the customer confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.txt")]
struct OrderConfirmationText<'a> {
    name: &'a str,
    order_id: String,
    items: &'a [ItemView],
    total: String,
    shipping_address: String,
    delivery_estimate: &'a str,
}

/// HTML template for the merchant notification email.
#[derive(Template)]
#[template(path = "email/merchant_order.html")]
struct MerchantOrderHtml<'a> {
    order_id: String,
    customer_name: String,
    customer_email: &'a str,
    customer_phone: &'a str,
    items: &'a [ItemView],
    total: String,
    payment_method: &'a str,
    shipping_address: String,
}

/// Plain text template for the merchant notification email.
#[derive(Template)]
#[template(path = "email/merchant_order.txt")]
struct MerchantOrderText<'a> {
    order_id: String,
    customer_name: String,
    customer_email: &'a str,
    customer_phone: &'a str,
    items: &'a [ItemView],
    total: String,
    payment_method: &'a str,
    shipping_address: String,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for order notifications.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send both notifications for a freshly placed order: the merchant copy
    /// and the customer confirmation.
    ///
    /// Each message gets a single attempt; the first failure is returned and
    /// the caller decides what to do with it.
    ///
    /// # Errors
    ///
    /// Returns error if a message fails to render or send.
    pub async fn send_order_emails(
        &self,
        order: &Order,
        customer_email: &str,
    ) -> Result<(), EmailError> {
        let items = item_views(order);
        let total = format_amount(order.total);
        let shipping_address = order.shipping_info.formatted_address();
        let customer_name = order.shipping_info.customer_name();

        let merchant_html = MerchantOrderHtml {
            order_id: order.id.to_string(),
            customer_name: customer_name.clone(),
            customer_email,
            customer_phone: &order.shipping_info.phone,
            items: &items,
            total: total.clone(),
            payment_method: &order.payment_method,
            shipping_address: shipping_address.clone(),
        }
        .render()?;
        let merchant_text = MerchantOrderText {
            order_id: order.id.to_string(),
            customer_name: customer_name.clone(),
            customer_email,
            customer_phone: &order.shipping_info.phone,
            items: &items,
            total: total.clone(),
            payment_method: &order.payment_method,
            shipping_address: shipping_address.clone(),
        }
        .render()?;

        self.send_multipart_email(
            MERCHANT_RECIPIENT,
            &format!("New order #{}", order.id),
            &merchant_text,
            &merchant_html,
        )
        .await?;

        let confirmation_html = OrderConfirmationHtml {
            name: &order.shipping_info.first_name,
            order_id: order.id.to_string(),
            items: &items,
            total: total.clone(),
            shipping_address: shipping_address.clone(),
            delivery_estimate: DELIVERY_ESTIMATE,
        }
        .render()?;
        let confirmation_text = OrderConfirmationText {
            name: &order.shipping_info.first_name,
            order_id: order.id.to_string(),
            items: &items,
            total,
            shipping_address,
            delivery_estimate: DELIVERY_ESTIMATE,
        }
        .render()?;

        self.send_multipart_email(
            customer_email,
            &format!("Your Velour order #{}", order.id),
            &confirmation_text,
            &confirmation_html,
        )
        .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

fn item_views(order: &Order) -> Vec<ItemView> {
    order
        .items
        .iter()
        .map(|item| ItemView {
            name: item.name.clone(),
            quantity: item.quantity,
            price: format_amount(item.price),
            line_total: format_amount(item.line_total()),
        })
        .collect()
}

/// Format a money amount with two decimal places.
fn format_amount(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount_two_decimals() {
        assert_eq!(format_amount(Decimal::new(12999, 2)), "$129.99");
        assert_eq!(format_amount(Decimal::new(50, 0)), "$50.00");
    }

    #[test]
    fn test_format_amount_rounds() {
        assert_eq!(format_amount(Decimal::new(12346, 3)), "$12.35");
        assert_eq!(format_amount(Decimal::new(12344, 3)), "$12.34");
    }
}
