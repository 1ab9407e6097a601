use std::fmt::Debug;

use log::*;

use crate::{
    shop_objects::CartContents,
    traits::{CartManagement, StorefrontError},
};

/// `CartApi` is the public API for basket operations. It validates requests before they reach the backend and
/// leaves the ownership checks to the backend, which performs them inside the same unit of work as the
/// mutation.
pub struct CartApi<B> {
    db: B,
}

impl<B> Debug for CartApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CartApi")
    }
}

impl<B> CartApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CartApi<B>
where B: CartManagement
{
    /// Adds a product to the owner's cart. Repeat adds for the same product sum quantities rather than
    /// creating duplicate lines. Returns the full cart at live catalog prices.
    pub async fn add_item(&self, owner: i64, product_id: i64, quantity: i64) -> Result<CartContents, StorefrontError> {
        check_quantity(quantity)?;
        let cart = self.db.add_cart_item(owner, product_id, quantity).await?;
        debug!("🛒️ User #{owner} added {quantity} x product #{product_id}. Cart total is now {}", cart.total);
        Ok(cart)
    }

    /// Overwrites the quantity on a cart line. A quantity of zero or less is rejected outright; removing a
    /// line is an explicit, separate operation.
    pub async fn update_quantity(
        &self,
        owner: i64,
        line_id: i64,
        quantity: i64,
    ) -> Result<CartContents, StorefrontError> {
        check_quantity(quantity)?;
        let cart = self.db.update_cart_item_quantity(owner, line_id, quantity).await?;
        debug!("🛒️ User #{owner} set cart line #{line_id} to {quantity}");
        Ok(cart)
    }

    pub async fn remove_item(&self, owner: i64, line_id: i64) -> Result<CartContents, StorefrontError> {
        let cart = self.db.remove_cart_item(owner, line_id).await?;
        debug!("🛒️ User #{owner} removed cart line #{line_id}");
        Ok(cart)
    }

    pub async fn cart(&self, owner: i64) -> Result<CartContents, StorefrontError> {
        self.db.fetch_cart(owner).await
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

fn check_quantity(quantity: i64) -> Result<(), StorefrontError> {
    if quantity <= 0 {
        return Err(StorefrontError::BadRequest("Quantity must be greater than zero".to_string()));
    }
    // Caps quantities so that price * quantity stays well inside i64 range.
    if quantity > i64::from(i32::MAX) {
        return Err(StorefrontError::BadRequest(format!("Quantity cannot exceed {}", i32::MAX)));
    }
    Ok(())
}
