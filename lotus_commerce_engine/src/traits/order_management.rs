use thiserror::Error;

use crate::{
    traits::{NewOrder, Order, OrderStatusType},
    vnpay::TxnRef,
};

#[derive(Debug, Clone, Error)]
pub enum OrderApiError {
    #[error("Order {0} not found")]
    OrderNotFound(TxnRef),
    #[error("Order {0} already exists")]
    DuplicateOrder(TxnRef),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Behaviour the order store must provide for the checkout and IPN flows.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Persists a new order in the `New` state. Inserting a transaction reference that already
    /// exists is a [`OrderApiError::DuplicateOrder`] error; references are unique per attempt.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderApiError>;

    async fn fetch_order_by_txn_ref(&self, txn_ref: &TxnRef) -> Result<Option<Order>, OrderApiError>;

    /// Updates the order's status, stamping `updated_at` and recording the gateway's transaction
    /// number when one is supplied.
    async fn update_order_status(
        &self,
        txn_ref: &TxnRef,
        status: OrderStatusType,
        gateway_txn_no: Option<String>,
    ) -> Result<Order, OrderApiError>;
}
