//! Invoice delivery
//!
//! Renders the plain-text invoice of an order and emails it. Delivery
//! problems come back as warnings; the payment itself is never undone.

use shared::models::{InvoiceDelivery, OrderDetail};

use crate::services::documents::render_invoice;
use crate::services::notifier::{Notification, Notifier, deliver};

/// Email the invoice to `recipient`, or to the order's customer when absent
pub async fn send_invoice(
    notifier: &dyn Notifier,
    restaurant: &str,
    detail: &OrderDetail,
    recipient: Option<&str>,
) -> InvoiceDelivery {
    let order_id = detail.order.id;
    let recipient = recipient
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .or_else(|| detail.customer_email.clone());

    let Some(to) = recipient else {
        return InvoiceDelivery {
            order_id,
            recipient: None,
            delivered: false,
            warnings: vec!["No invoice recipient: order has no customer email".into()],
        };
    };

    let body = render_invoice(restaurant, detail, detail.payment.as_ref());
    let notification = Notification::email(
        to.clone(),
        format!("{restaurant} invoice for order #{order_id}"),
        body,
    );

    let warnings: Vec<String> = deliver(notifier, &notification).await.into_iter().collect();
    if warnings.is_empty() {
        tracing::info!(order_id, to = %to, "Invoice sent");
    }

    InvoiceDelivery {
        order_id,
        recipient: Some(to),
        delivered: warnings.is_empty(),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notifier::LogNotifier;
    use shared::models::{Order, OrderStatus};

    fn detail(customer_email: Option<&str>) -> OrderDetail {
        OrderDetail {
            order: Order {
                id: 42,
                customer_id: None,
                table_id: None,
                status: OrderStatus::Paid,
                total_amount: 12.5,
                created_at: 0,
                updated_at: 0,
            },
            items: Vec::new(),
            table_name: None,
            customer_name: None,
            customer_email: customer_email.map(str::to_string),
            payment: None,
        }
    }

    #[tokio::test]
    async fn test_falls_back_to_customer_email() {
        let outbox = LogNotifier::new();
        let sent = send_invoice(&outbox, "Bistro", &detail(Some("ada@example.com")), None).await;
        assert!(sent.delivered);
        assert_eq!(sent.recipient.as_deref(), Some("ada@example.com"));
        assert_eq!(outbox.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_explicit_recipient_wins() {
        let outbox = LogNotifier::new();
        let sent = send_invoice(
            &outbox,
            "Bistro",
            &detail(Some("ada@example.com")),
            Some("books@example.com"),
        )
        .await;
        assert_eq!(sent.recipient.as_deref(), Some("books@example.com"));
    }

    #[tokio::test]
    async fn test_no_recipient_is_a_warning() {
        let outbox = LogNotifier::new();
        let sent = send_invoice(&outbox, "Bistro", &detail(None), None).await;
        assert!(!sent.delivered);
        assert_eq!(sent.warnings.len(), 1);
        assert!(outbox.sent().is_empty());
    }
}
