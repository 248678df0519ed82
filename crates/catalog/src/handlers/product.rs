use std::collections::HashMap;
use std::sync::Arc;

use sellerhub_core::{Entity, ProductId, SellerId};

use crate::error::{CatalogError, Missing};
use crate::product::{Product, ProductPayload, ProductView};
use crate::seller::Seller;
use crate::store::{ProductStore, RecordStore, SellerStore};

#[derive(Clone)]
pub struct ProductHandler {
    products: Arc<dyn ProductStore>,
    sellers: Arc<dyn SellerStore>,
}

impl ProductHandler {
    pub fn new(products: Arc<dyn ProductStore>, sellers: Arc<dyn SellerStore>) -> Self {
        Self { products, sellers }
    }

    pub async fn create(&self, payload: ProductPayload) -> Result<ProductView, CatalogError> {
        let record = payload.validate()?;
        let seller = self.resolve_seller(record.seller_id).await?;

        let product = self.products.create(Product::new(record)).await?;
        tracing::info!(product_id = %product.id(), seller_id = %seller.id(), "product created");
        Ok(ProductView::new(product, Some(seller)))
    }

    pub async fn list(&self) -> Result<Vec<ProductView>, CatalogError> {
        let products = self.products.find_all().await?;

        let mut sellers: HashMap<SellerId, Option<Seller>> = HashMap::new();
        let mut views = Vec::with_capacity(products.len());
        for product in products {
            let seller_id = product.seller_id();
            let seller = match sellers.get(&seller_id) {
                Some(cached) => cached.clone(),
                None => {
                    let found = self.sellers.find_by_id(seller_id).await?;
                    sellers.insert(seller_id, found.clone());
                    found
                }
            };
            views.push(ProductView::new(product, seller));
        }
        Ok(views)
    }

    pub async fn get(&self, id: ProductId) -> Result<ProductView, CatalogError> {
        let product = self.find(id).await?;
        let seller = self.sellers.find_by_id(product.seller_id()).await?;
        Ok(ProductView::new(product, seller))
    }

    /// Full replace of name, value and owning seller; the id is kept.
    pub async fn update(&self, id: ProductId, payload: ProductPayload) -> Result<ProductView, CatalogError> {
        let mut product = self.find(id).await?;
        let record = payload.validate()?;
        let seller = self.resolve_seller(record.seller_id).await?;

        product.apply(record);
        let product = self.products.save(product).await?;
        tracing::info!(product_id = %id, seller_id = %seller.id(), "product updated");
        Ok(ProductView::new(product, Some(seller)))
    }

    pub async fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        let product = self.find(id).await?;
        self.products.delete(*product.id()).await?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    async fn find(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(Missing::Product(id)))
    }

    async fn resolve_seller(&self, id: SellerId) -> Result<Seller, CatalogError> {
        self.sellers
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(Missing::ReferencedSeller(id)))
    }
}
