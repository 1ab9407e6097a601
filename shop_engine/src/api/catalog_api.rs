use std::fmt::Debug;

use crate::{
    db_types::Product,
    traits::{ProductCatalog, StorefrontError},
};

/// Read-only catalog lookups. Catalog CRUD lives upstream; this only resolves products for display.
pub struct CatalogApi<B> {
    db: B,
}

impl<B> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi")
    }
}

impl<B> CatalogApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CatalogApi<B>
where B: ProductCatalog
{
    pub async fn product(&self, product_id: i64) -> Result<Product, StorefrontError> {
        self.db.fetch_product(product_id).await?.ok_or_else(|| StorefrontError::not_found("Product"))
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
