use crate::{
    db_types::{Order, OrderStatus},
    shop_objects::OrderWithItems,
    traits::StorefrontError,
};

/// The outcome of a paid-order reconciliation attempt. Duplicate webhook deliveries land on the `AlreadyPaid`
/// arm and must not re-apply any side effect.
#[derive(Debug, Clone)]
pub enum ReconciliationOutcome {
    /// The order transitioned to `Paid` and the paid-at time was stamped.
    MarkedPaid(Order),
    /// The order was already `Paid`; nothing was changed.
    AlreadyPaid(Order),
}

impl ReconciliationOutcome {
    pub fn order(&self) -> &Order {
        match self {
            ReconciliationOutcome::MarkedPaid(o) | ReconciliationOutcome::AlreadyPaid(o) => o,
        }
    }
}

/// Order lifecycle management.
///
/// `checkout_cart` is the single compound operation in the core that must be atomic: reading the cart,
/// snapshotting it into order lines and clearing the cart happen in one transaction, so a crash mid-sequence
/// can neither lose the cart nor duplicate the order.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Converts the owner's cart into a new `Draft` order, atomically.
    ///
    /// Each cart line is frozen into an order line at the product's current price; the order total is the sum
    /// of the line subtotals; the cart is emptied. Fails with `NotFound` if the cart is empty.
    async fn checkout_cart(&self, owner: i64) -> Result<OrderWithItems, StorefrontError>;

    async fn fetch_order(&self, order_id: i64) -> Result<Option<OrderWithItems>, StorefrontError>;

    async fn fetch_orders_for_user(&self, owner: i64) -> Result<Vec<OrderWithItems>, StorefrontError>;

    /// Deletes the order and its lines iff the order is still open (`Draft` or `Pending`). Returns `true` if a
    /// row was deleted. The status guard is applied in the same statement as the delete.
    async fn delete_order_if_open(&self, order_id: i64) -> Result<bool, StorefrontError>;

    /// Conditionally overwrites the status of an open order. Returns the updated order, or `None` if the order
    /// was not in the `Draft`/`Pending` band at the time of the update.
    async fn set_order_status(&self, order_id: i64, status: OrderStatus) -> Result<Option<Order>, StorefrontError>;

    /// The idempotent paid transition used by webhook reconciliation.
    ///
    /// Implemented as a single conditional update (`... WHERE status != 'Paid'`) so that two concurrent
    /// deliveries of the same confirmation cannot both apply the transition.
    async fn mark_order_paid(&self, order_id: i64) -> Result<ReconciliationOutcome, StorefrontError>;
}
