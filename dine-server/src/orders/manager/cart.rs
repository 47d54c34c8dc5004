//! Cart / line-item management
//!
//! The cart is the customer's latest active order. Adding to an order that
//! was already sent to the kitchen or to payment reopens it (back to
//! `pending`); editing or removing lines requires `pending`.

use super::{
    ManagerError, ManagerResult, OrdersManager, apply_transition, build_detail, ensure_access,
    load_order, recompute_total,
};
use crate::auth::{CustomerPrincipal, Principal};
use crate::db::repository::{RepoError, order, product};
use crate::orders::money::MAX_QUANTITY;
use crate::orders::occupancy;
use shared::models::{Order, OrderDetail, OrderStatus};
use sqlx::SqliteConnection;

/// Missing or non-positive quantities count as one
pub(crate) fn normalize_add_quantity(quantity: Option<i64>) -> ManagerResult<i64> {
    match quantity {
        Some(q) if q > MAX_QUANTITY => Err(ManagerError::InvalidQuantity(q)),
        Some(q) if q >= 1 => Ok(q),
        _ => Ok(1),
    }
}

/// Merge `quantity` of a product into `order`, reopening it if needed
///
/// Runs on the caller's transaction; does not sync occupancy.
pub(crate) async fn add_item(
    conn: &mut SqliteConnection,
    order: &Order,
    product_id: i64,
    quantity: i64,
) -> ManagerResult<()> {
    let item_product = product::find_by_id(&mut *conn, product_id)
        .await?
        .ok_or(ManagerError::ProductNotFound(product_id))?;
    if !item_product.is_available {
        return Err(ManagerError::ProductUnavailable(product_id));
    }

    match order.status {
        OrderStatus::Pending => {}
        OrderStatus::Completed | OrderStatus::PaymentPending => {
            apply_transition(conn, order, OrderStatus::Pending).await?;
        }
        OrderStatus::Paid => return Err(ManagerError::OrderAlreadyPaid(order.id)),
        OrderStatus::Cancelled => return Err(ManagerError::OrderAlreadyCancelled(order.id)),
    }

    let existing = order::find_item_for_product(&mut *conn, order.id, product_id)
        .await?
        .map_or(0, |item| item.quantity);
    if existing + quantity > MAX_QUANTITY {
        return Err(ManagerError::InvalidQuantity(existing + quantity));
    }

    order::upsert_item(&mut *conn, order.id, product_id, quantity, item_product.price).await?;
    recompute_total(conn, order.id).await?;

    tracing::debug!(order_id = order.id, product_id, quantity, "Item added");
    Ok(())
}

impl OrdersManager {
    /// The customer's current cart, if any
    pub async fn cart(&self, customer: &CustomerPrincipal) -> ManagerResult<Option<OrderDetail>> {
        let mut conn = self.pool.acquire().await.map_err(RepoError::from)?;
        match order::find_latest_active_for_customer(&mut *conn, customer.id).await? {
            Some(current) => Ok(Some(build_detail(&mut conn, current).await?)),
            None => Ok(None),
        }
    }

    /// Add a product to the cart, creating the cart on first add
    pub async fn add_to_cart(
        &self,
        customer: &CustomerPrincipal,
        product_id: i64,
        quantity: Option<i64>,
    ) -> ManagerResult<OrderDetail> {
        let quantity = normalize_add_quantity(quantity)?;
        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;

        let cart = match order::find_latest_active_for_customer(&mut *tx, customer.id).await? {
            Some(existing) => existing,
            None => {
                let created = order::create(&mut tx, Some(customer.id), None).await?;
                tracing::info!(order_id = created.id, customer_id = customer.id, "Cart opened");
                created
            }
        };

        add_item(&mut tx, &cart, product_id, quantity).await?;
        occupancy::sync_tables(&mut tx, [cart.table_id]).await?;

        let updated = load_order(&mut tx, cart.id).await?;
        let detail = build_detail(&mut tx, updated).await?;
        tx.commit().await.map_err(RepoError::from)?;
        Ok(detail)
    }

    /// Set the quantity of a line; zero or less removes it
    pub async fn update_cart_item(
        &self,
        principal: &Principal,
        item_id: i64,
        quantity: i64,
    ) -> ManagerResult<OrderDetail> {
        if quantity > MAX_QUANTITY {
            return Err(ManagerError::InvalidQuantity(quantity));
        }
        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
        let owner = editable_order_of_item(&mut tx, principal, item_id).await?;

        if quantity <= 0 {
            order::delete_item(&mut *tx, item_id).await?;
        } else {
            order::set_item_quantity(&mut *tx, item_id, quantity).await?;
        }
        recompute_total(&mut tx, owner.id).await?;

        let updated = load_order(&mut tx, owner.id).await?;
        let detail = build_detail(&mut tx, updated).await?;
        tx.commit().await.map_err(RepoError::from)?;
        Ok(detail)
    }

    /// Remove a line from a pending order
    pub async fn remove_cart_item(
        &self,
        principal: &Principal,
        item_id: i64,
    ) -> ManagerResult<OrderDetail> {
        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
        let owner = editable_order_of_item(&mut tx, principal, item_id).await?;

        order::delete_item(&mut *tx, item_id).await?;
        recompute_total(&mut tx, owner.id).await?;

        let updated = load_order(&mut tx, owner.id).await?;
        let detail = build_detail(&mut tx, updated).await?;
        tx.commit().await.map_err(RepoError::from)?;
        Ok(detail)
    }
}

/// The order owning `item_id`, checked for access and `pending` status
async fn editable_order_of_item(
    conn: &mut SqliteConnection,
    principal: &Principal,
    item_id: i64,
) -> ManagerResult<Order> {
    let item = order::find_item(&mut *conn, item_id)
        .await?
        .ok_or(ManagerError::ItemNotFound(item_id))?;
    let owner = load_order(conn, item.order_id).await?;
    ensure_access(principal, &owner)?;
    if owner.status != OrderStatus::Pending {
        return Err(ManagerError::OrderNotEditable {
            id: owner.id,
            status: owner.status,
        });
    }
    Ok(owner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_quantity_is_coerced_to_at_least_one() {
        assert_eq!(normalize_add_quantity(None).unwrap(), 1);
        assert_eq!(normalize_add_quantity(Some(0)).unwrap(), 1);
        assert_eq!(normalize_add_quantity(Some(-3)).unwrap(), 1);
        assert_eq!(normalize_add_quantity(Some(2)).unwrap(), 2);
        assert!(matches!(
            normalize_add_quantity(Some(MAX_QUANTITY + 1)),
            Err(ManagerError::InvalidQuantity(_))
        ));
    }
}
