use crate::{db_types::Product, traits::StorefrontError};

/// Read-only access to the product catalog.
///
/// Catalog CRUD belongs to an external collaborator; the core only ever resolves a product by id for its
/// current price, name and stock. A missing product is a hard error at the call sites, never a default.
#[allow(async_fn_in_trait)]
pub trait ProductCatalog {
    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, StorefrontError>;
}
