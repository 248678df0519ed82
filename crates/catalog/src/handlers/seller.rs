use std::sync::Arc;

use sellerhub_core::{Entity, SellerId};

use crate::error::{CatalogError, Missing};
use crate::seller::{Seller, SellerPayload};
use crate::store::{ProductStore, RecordStore, SellerStore};

#[derive(Clone)]
pub struct SellerHandler {
    sellers: Arc<dyn SellerStore>,
    products: Arc<dyn ProductStore>,
}

impl SellerHandler {
    pub fn new(sellers: Arc<dyn SellerStore>, products: Arc<dyn ProductStore>) -> Self {
        Self { sellers, products }
    }

    pub async fn create(&self, payload: SellerPayload) -> Result<Seller, CatalogError> {
        let record = payload.validate()?;
        let seller = self.sellers.create(Seller::new(record)).await?;
        tracing::info!(seller_id = %seller.id(), "seller created");
        Ok(seller)
    }

    pub async fn list(&self) -> Result<Vec<Seller>, CatalogError> {
        Ok(self.sellers.find_all().await?)
    }

    pub async fn get(&self, id: SellerId) -> Result<Seller, CatalogError> {
        self.sellers
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(Missing::Seller(id)))
    }

    /// Full replace of name and email. Existence is checked before the payload
    /// is validated, so an unknown id is a 404 even with an invalid body.
    pub async fn update(&self, id: SellerId, payload: SellerPayload) -> Result<Seller, CatalogError> {
        let mut seller = self.get(id).await?;
        seller.apply(payload.validate()?);
        let seller = self.sellers.save(seller).await?;
        tracing::info!(seller_id = %id, "seller updated");
        Ok(seller)
    }

    /// Delete a seller and every product that references it.
    ///
    /// Dependents go first so no product is ever left pointing at a missing
    /// seller. Returns how many products were removed with it.
    pub async fn delete(&self, id: SellerId) -> Result<usize, CatalogError> {
        let seller = self.get(id).await?;

        let dependents = self.products.find_by_seller(id).await?;
        for product in &dependents {
            self.products.delete(*product.id()).await?;
        }
        self.sellers.delete(*seller.id()).await?;

        tracing::info!(seller_id = %id, cascaded_products = dependents.len(), "seller deleted");
        Ok(dependents.len())
    }
}
