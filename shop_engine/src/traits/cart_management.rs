use crate::{shop_objects::CartContents, traits::StorefrontError};

/// Basket management for a single buyer.
///
/// Implementations must re-read the owner row and the cart line inside the same unit of work as the mutation and
/// assert ownership before acting, so that a guessed line id can never touch another buyer's basket.
#[allow(async_fn_in_trait)]
pub trait CartManagement {
    /// Adds `quantity` of the product to the owner's cart.
    ///
    /// If a line for (owner, product) already exists its quantity is incremented, otherwise a new line is
    /// created. The product must resolve in the catalog. Returns the full cart at live catalog prices.
    async fn add_cart_item(&self, owner: i64, product_id: i64, quantity: i64)
        -> Result<CartContents, StorefrontError>;

    /// Overwrites the quantity on an owned cart line. The quantity must already have been validated as
    /// strictly positive.
    async fn update_cart_item_quantity(
        &self,
        owner: i64,
        line_id: i64,
        quantity: i64,
    ) -> Result<CartContents, StorefrontError>;

    /// Ownership-checked removal of a single cart line.
    async fn remove_cart_item(&self, owner: i64, line_id: i64) -> Result<CartContents, StorefrontError>;

    /// The owner's cart joined with live product data. The total is Σ(current price × quantity); nothing here
    /// is a snapshot.
    async fn fetch_cart(&self, owner: i64) -> Result<CartContents, StorefrontError>;
}
