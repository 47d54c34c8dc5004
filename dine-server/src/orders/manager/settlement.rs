//! Status transitions after placement: payment request, settlement,
//! cancellation, reopen and the status-update dispatcher.

use super::{
    ManagerError, ManagerResult, OrdersManager, apply_transition, build_detail, ensure_access,
    ensure_not_terminal, load_order, recompute_total,
};
use crate::auth::{Principal, StaffPrincipal};
use crate::db::repository::{RepoError, payment};
use crate::orders::occupancy;
use chrono::{DateTime, Utc};
use shared::models::{
    Order, OrderDetail, OrderStatus, OrderStatusUpdate, Payment, PaymentMethod, PaymentRequest,
};

const CARD_MIN_DIGITS: usize = 12;
const CARD_MAX_DIGITS: usize = 19;

/// `PAY-{order_id}-{YYYYMMDDhhmmss}` in UTC
pub fn transaction_id(order_id: i64, at: DateTime<Utc>) -> String {
    format!("PAY-{}-{}", order_id, at.format("%Y%m%d%H%M%S"))
}

/// Validate a card number and keep only its last four digits
///
/// Spaces and dashes are ignored.
pub fn card_last4(number: &str) -> ManagerResult<String> {
    let digits: String = number
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ManagerError::InvalidCard(
            "card number must contain only digits".into(),
        ));
    }
    if !(CARD_MIN_DIGITS..=CARD_MAX_DIGITS).contains(&digits.len()) {
        return Err(ManagerError::InvalidCard(format!(
            "card number must have {CARD_MIN_DIGITS}-{CARD_MAX_DIGITS} digits"
        )));
    }
    Ok(digits[digits.len() - 4..].to_string())
}

impl OrdersManager {
    /// Ask for the bill: `pending | completed → payment_pending`
    pub async fn request_payment(&self, principal: &Principal, order_id: i64) -> ManagerResult<Order> {
        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
        let current = load_order(&mut tx, order_id).await?;
        ensure_access(principal, &current)?;
        ensure_not_terminal(&current)?;

        let (total, item_count) = recompute_total(&mut tx, order_id).await?;
        if item_count == 0 {
            return Err(ManagerError::OrderEmpty(order_id));
        }
        apply_transition(&mut tx, &current, OrderStatus::PaymentPending).await?;

        let updated = load_order(&mut tx, order_id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(order_id, total, by = ?principal.role(), "Payment requested");
        Ok(updated)
    }

    /// Settle an order at the till, recording exactly one payment
    ///
    /// An order still `pending`/`completed` first moves to `payment_pending`
    /// inside the same transaction. The amount is the freshly recomputed total.
    pub async fn complete_payment(
        &self,
        staff: &StaffPrincipal,
        order_id: i64,
        request: &PaymentRequest,
    ) -> ManagerResult<(Order, Payment)> {
        let card_last4 = match request.method {
            PaymentMethod::Card => {
                let number = request
                    .card_number
                    .as_deref()
                    .ok_or_else(|| ManagerError::InvalidCard("card number is required".into()))?;
                Some(card_last4(number)?)
            }
            PaymentMethod::Cash => None,
        };

        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
        let mut current = load_order(&mut tx, order_id).await?;
        ensure_not_terminal(&current)?;

        let (amount, item_count) = recompute_total(&mut tx, order_id).await?;
        if item_count == 0 {
            return Err(ManagerError::OrderEmpty(order_id));
        }

        if current.status != OrderStatus::PaymentPending {
            apply_transition(&mut tx, &current, OrderStatus::PaymentPending).await?;
            current = load_order(&mut tx, order_id).await?;
        }
        apply_transition(&mut tx, &current, OrderStatus::Paid).await?;

        let recorded = payment::insert(
            &mut tx,
            payment::NewPayment {
                order_id,
                amount,
                method: request.method,
                transaction_id: transaction_id(order_id, Utc::now()),
                card_last4,
                recorded_by: Some(staff.id),
            },
        )
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => ManagerError::OrderAlreadyPaid(order_id),
            other => other.into(),
        })?;

        occupancy::sync_tables(&mut tx, [current.table_id]).await?;

        let paid = load_order(&mut tx, order_id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            order_id,
            amount,
            method = %recorded.method,
            transaction_id = %recorded.transaction_id,
            staff_id = staff.id,
            "Payment recorded"
        );
        Ok((paid, recorded))
    }

    /// Cancel an active order; staff may cancel any, customers their own
    pub async fn cancel_order(&self, principal: &Principal, order_id: i64) -> ManagerResult<Order> {
        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
        let current = load_order(&mut tx, order_id).await?;
        ensure_access(principal, &current)?;
        ensure_not_terminal(&current)?;

        apply_transition(&mut tx, &current, OrderStatus::Cancelled).await?;
        occupancy::sync_tables(&mut tx, [current.table_id]).await?;

        let cancelled = load_order(&mut tx, order_id).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(order_id, by = ?principal.role(), "Order cancelled");
        Ok(cancelled)
    }

    /// Move an order back to `pending`; already pending is a no-op
    pub async fn reopen_order(&self, principal: &Principal, order_id: i64) -> ManagerResult<Order> {
        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
        let current = load_order(&mut tx, order_id).await?;
        ensure_access(principal, &current)?;
        ensure_not_terminal(&current)?;

        if current.status == OrderStatus::Pending {
            return Ok(current);
        }
        apply_transition(&mut tx, &current, OrderStatus::Pending).await?;

        let reopened = load_order(&mut tx, order_id).await?;
        tx.commit().await.map_err(RepoError::from)?;
        Ok(reopened)
    }

    /// `pending → completed` for an order already bound to a table
    pub async fn mark_sent_to_kitchen(&self, principal: &Principal, order_id: i64) -> ManagerResult<Order> {
        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
        let current = load_order(&mut tx, order_id).await?;
        ensure_access(principal, &current)?;
        ensure_not_terminal(&current)?;

        if current.table_id.is_none() {
            return Err(ManagerError::TableRequired);
        }
        let (_, item_count) = recompute_total(&mut tx, order_id).await?;
        if item_count == 0 {
            return Err(ManagerError::OrderEmpty(order_id));
        }
        apply_transition(&mut tx, &current, OrderStatus::Completed).await?;
        occupancy::sync_tables(&mut tx, [current.table_id]).await?;

        let sent = load_order(&mut tx, order_id).await?;
        tx.commit().await.map_err(RepoError::from)?;
        Ok(sent)
    }

    /// Dispatch a requested target status to the matching operation
    pub async fn update_status(
        &self,
        principal: &Principal,
        order_id: i64,
        update: &OrderStatusUpdate,
    ) -> ManagerResult<OrderDetail> {
        match update.status {
            OrderStatus::Cancelled => {
                self.cancel_order(principal, order_id).await?;
            }
            OrderStatus::PaymentPending => {
                self.request_payment(principal, order_id).await?;
            }
            OrderStatus::Paid => {
                let Principal::Staff(staff) = principal else {
                    return Err(ManagerError::StaffOnly("completing a payment"));
                };
                let request = PaymentRequest {
                    method: update.method.unwrap_or_default(),
                    card_number: update.card_number.clone(),
                    invoice_email: None,
                };
                self.complete_payment(staff, order_id, &request).await?;
            }
            OrderStatus::Pending => {
                self.reopen_order(principal, order_id).await?;
            }
            OrderStatus::Completed => {
                self.mark_sent_to_kitchen(principal, order_id).await?;
            }
        }

        let mut conn = self.pool.acquire().await.map_err(RepoError::from)?;
        let updated = load_order(&mut conn, order_id).await?;
        build_detail(&mut conn, updated).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_transaction_id_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(transaction_id(42, at), "PAY-42-20240309070501");
    }

    #[test]
    fn test_card_last4() {
        assert_eq!(card_last4("4111 1111 1111 1234").unwrap(), "1234");
        assert_eq!(card_last4("4111-1111-1111-9876").unwrap(), "9876");
        assert!(matches!(card_last4("12345"), Err(ManagerError::InvalidCard(_))));
        assert!(matches!(
            card_last4("4111 1111 1111 12a4"),
            Err(ManagerError::InvalidCard(_))
        ));
        assert!(card_last4(&"1".repeat(20)).is_err());
        assert!(card_last4(&"1".repeat(19)).is_ok());
    }
}
