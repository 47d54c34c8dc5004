use crate::db::repository::RepoError;
use shared::models::OrderStatus;
use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Manager errors
///
/// Not-found, state-conflict and validation failures stay distinct so the
/// API can report them differently.
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),

    // ========== Not found ==========
    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("No active cart")]
    NoActiveCart,

    #[error("Order item not found: {0}")]
    ItemNotFound(i64),

    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    #[error("Table not found: {0}")]
    TableNotFound(i64),

    // ========== State conflicts ==========
    #[error("Order {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: i64,
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("Order already paid: {0}")]
    OrderAlreadyPaid(i64),

    #[error("Order already cancelled: {0}")]
    OrderAlreadyCancelled(i64),

    #[error("Order {id} is {status} and can no longer be edited")]
    OrderNotEditable { id: i64, status: OrderStatus },

    #[error("Order {0} was modified concurrently")]
    ConcurrentUpdate(i64),

    #[error("Table is already occupied: {0}")]
    TableOccupied(i64),

    #[error("Table {0} has active orders")]
    TableHasActiveOrders(i64),

    // ========== Validation ==========
    #[error("Order has no items: {0}")]
    OrderEmpty(i64),

    #[error("A table must be selected")]
    TableRequired,

    #[error("Product is not available: {0}")]
    ProductUnavailable(i64),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    #[error("Invalid card: {0}")]
    InvalidCard(String),

    // ========== Permission ==========
    #[error("Order {0} belongs to another customer")]
    NotOrderOwner(i64),

    #[error("Staff only: {0}")]
    StaffOnly(&'static str),
}

impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        let message = err.to_string();
        match err {
            ManagerError::Repo(e) => {
                tracing::error!(error = %e, "Repository error in order coordinator");
                e.into()
            }
            ManagerError::OrderNotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, message).with_detail("order_id", id)
            }
            ManagerError::NoActiveCart => AppError::with_message(ErrorCode::OrderNotFound, message),
            ManagerError::ItemNotFound(id) => {
                AppError::with_message(ErrorCode::OrderItemNotFound, message)
                    .with_detail("item_id", id)
            }
            ManagerError::ProductNotFound(id) => {
                AppError::with_message(ErrorCode::ProductNotFound, message)
                    .with_detail("product_id", id)
            }
            ManagerError::TableNotFound(id) => {
                AppError::with_message(ErrorCode::TableNotFound, message).with_detail("table_id", id)
            }
            ManagerError::InvalidTransition { id, from, to } => {
                AppError::with_message(ErrorCode::InvalidStatusTransition, message)
                    .with_detail("order_id", id)
                    .with_detail("from", from.as_str())
                    .with_detail("to", to.as_str())
            }
            ManagerError::OrderAlreadyPaid(id) => {
                AppError::with_message(ErrorCode::OrderAlreadyPaid, message)
                    .with_detail("order_id", id)
            }
            ManagerError::OrderAlreadyCancelled(id) => {
                AppError::with_message(ErrorCode::OrderAlreadyCancelled, message)
                    .with_detail("order_id", id)
            }
            ManagerError::OrderNotEditable { id, status } => {
                AppError::with_message(ErrorCode::OrderNotEditable, message)
                    .with_detail("order_id", id)
                    .with_detail("status", status.as_str())
            }
            ManagerError::ConcurrentUpdate(id) => {
                AppError::with_message(ErrorCode::InvalidStatusTransition, message)
                    .with_detail("order_id", id)
            }
            ManagerError::TableOccupied(id) => {
                AppError::with_message(ErrorCode::TableOccupied, message).with_detail("table_id", id)
            }
            ManagerError::TableHasActiveOrders(id) => {
                AppError::with_message(ErrorCode::TableHasOrders, message)
                    .with_detail("table_id", id)
            }
            ManagerError::OrderEmpty(id) => {
                AppError::with_message(ErrorCode::OrderEmpty, message).with_detail("order_id", id)
            }
            ManagerError::TableRequired => AppError::with_message(ErrorCode::TableRequired, message),
            ManagerError::ProductUnavailable(id) => {
                AppError::with_message(ErrorCode::ProductUnavailable, message)
                    .with_detail("product_id", id)
            }
            ManagerError::InvalidQuantity(q) => {
                AppError::with_message(ErrorCode::ValueOutOfRange, message)
                    .with_detail("quantity", q)
            }
            ManagerError::InvalidCard(_) => {
                AppError::with_message(ErrorCode::PaymentCardInvalid, message)
            }
            ManagerError::NotOrderOwner(id) => {
                AppError::with_message(ErrorCode::NotOrderOwner, message).with_detail("order_id", id)
            }
            ManagerError::StaffOnly(_) => AppError::with_message(ErrorCode::StaffRequired, message),
        }
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;
