use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Order, OrderStatus},
    shop_objects::OrderWithItems,
    traits::{OrderManagement, ReconciliationOutcome, StorefrontError},
};

/// `OrderFlowApi` is the primary API for the order lifecycle: checkout, queries, client-side status changes and
/// the provider-driven paid transition.
///
/// Status transition rules, seen from the client path:
///
/// | From \ To | Draft | Pending | Cancelled | Paid / Shipped / Delivered |
/// |-----------|-------|---------|-----------|----------------------------|
/// | Draft     | Ok    | Ok      | Ok        | Err                        |
/// | Pending   | Ok    | Ok      | Ok        | Err                        |
/// | other     | Err   | Err     | Err       | Err                        |
///
/// `Paid` is reachable *only* through [`Self::order_paid`], which is driven by the verified provider webhook.
/// This is deliberate: payment confirmation must be provider-verified, so the client-facing update can never
/// claim an order was paid.
pub struct OrderFlowApi<B> {
    db: B,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> OrderFlowApi<B>
where B: OrderManagement
{
    /// Converts the owner's cart into a new order. The snapshot (read cart, freeze lines at current prices,
    /// clear cart, insert order) is a single transaction in the backend.
    pub async fn create_order(&self, owner: i64) -> Result<OrderWithItems, StorefrontError> {
        let order = self.db.checkout_cart(owner).await?;
        info!(
            "📦️ Order #{} created for user #{owner} with {} lines, total {}",
            order.order.id,
            order.items.len(),
            order.order.total
        );
        Ok(order)
    }

    /// Fetches a single order. Fails `NotFound` if the order does not exist and `Forbidden` if it belongs to
    /// someone else. The existence check runs first so that a Forbidden response never leaks an order id probe.
    pub async fn order(&self, owner: i64, order_id: i64) -> Result<OrderWithItems, StorefrontError> {
        let order = self.fetch_owned(owner, order_id).await?;
        Ok(order)
    }

    pub async fn orders_for(&self, owner: i64) -> Result<Vec<OrderWithItems>, StorefrontError> {
        self.db.fetch_orders_for_user(owner).await
    }

    /// Ownership-checked delete. Only open orders (`Draft`/`Pending`) can be deleted; the status guard is
    /// enforced in the same statement as the delete, so a concurrent paid transition cannot be lost.
    pub async fn delete_order(&self, owner: i64, order_id: i64) -> Result<(), StorefrontError> {
        let order = self.fetch_owned(owner, order_id).await?;
        if !order.order.status.is_open() {
            return Err(StorefrontError::BadRequest(format!(
                "Order #{order_id} is already {} and can no longer be deleted",
                order.order.status
            )));
        }
        let deleted = self.db.delete_order_if_open(order_id).await?;
        if !deleted {
            // The order left the open band between the fetch and the delete.
            return Err(StorefrontError::BadRequest(format!(
                "Order #{order_id} is already being processed and can no longer be deleted"
            )));
        }
        info!("📦️ Order #{order_id} deleted by user #{owner}");
        Ok(())
    }

    /// The client-initiated status update. Restricted to the `Draft ⇄ Pending` band and `Cancelled`; an order
    /// that is already `Paid` (or further along) is immutable through this path.
    pub async fn update_status(
        &self,
        owner: i64,
        order_id: i64,
        new_status: OrderStatus,
    ) -> Result<Order, StorefrontError> {
        if !matches!(new_status, OrderStatus::Draft | OrderStatus::Pending | OrderStatus::Cancelled) {
            return Err(StorefrontError::BadRequest(format!(
                "Orders cannot be moved to {new_status} by the buyer"
            )));
        }
        let order = self.fetch_owned(owner, order_id).await?;
        if !order.order.status.is_open() {
            return Err(StorefrontError::BadRequest(format!(
                "Order #{order_id} is already {} and can no longer be modified",
                order.order.status
            )));
        }
        let updated = self.db.set_order_status(order_id, new_status).await?.ok_or_else(|| {
            StorefrontError::BadRequest(format!("Order #{order_id} is already being processed"))
        })?;
        info!("📦️ Order #{order_id} moved to {new_status} by user #{owner}");
        Ok(updated)
    }

    /// The reconciliation entry point. Applies the idempotent paid transition for a confirmed payment; calling
    /// it twice for the same order applies the transition exactly once.
    pub async fn order_paid(&self, order_id: i64) -> Result<ReconciliationOutcome, StorefrontError> {
        let outcome = self.db.mark_order_paid(order_id).await?;
        match &outcome {
            ReconciliationOutcome::MarkedPaid(o) => {
                info!("📦️💰️ Order #{} marked as paid. Total {}", o.id, o.total)
            },
            ReconciliationOutcome::AlreadyPaid(o) => {
                debug!("📦️💰️ Order #{} was already paid. Duplicate confirmation ignored", o.id)
            },
        }
        Ok(outcome)
    }

    async fn fetch_owned(&self, owner: i64, order_id: i64) -> Result<OrderWithItems, StorefrontError> {
        let order = self
            .db
            .fetch_order(order_id)
            .await?
            .ok_or_else(|| StorefrontError::NotFound(format!("Order #{order_id}")))?;
        if order.order.user_id != owner {
            debug!("📦️ User #{owner} tried to access order #{order_id} belonging to user #{}", order.order.user_id);
            return Err(StorefrontError::Forbidden(format!("Order #{order_id} does not belong to this user")));
        }
        Ok(order)
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
