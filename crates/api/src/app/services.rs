use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use sellerhub_catalog::{ProductHandler, ProductStore, SellerHandler, SellerStore};
use sellerhub_infra::store::{
    InMemoryProductStore, InMemorySellerStore, PgProductStore, PgSellerStore, ensure_schema,
};

use crate::config::StorageConfig;

/// Resource handlers shared by every request.
#[derive(Clone)]
pub struct AppServices {
    pub sellers: SellerHandler,
    pub products: ProductHandler,
}

impl AppServices {
    /// Wire both handlers to the same pair of stores.
    pub fn new(sellers: Arc<dyn SellerStore>, products: Arc<dyn ProductStore>) -> Self {
        Self {
            sellers: SellerHandler::new(sellers.clone(), products.clone()),
            products: ProductHandler::new(products, sellers),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemorySellerStore::new()),
            Arc::new(InMemoryProductStore::new()),
        )
    }
}

pub async fn build_services(storage: &StorageConfig) -> anyhow::Result<AppServices> {
    match storage {
        StorageConfig::InMemory => {
            tracing::info!("using in-memory stores; data is lost on restart");
            Ok(AppServices::in_memory())
        }
        StorageConfig::Postgres { database_url } => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await
                .context("failed to connect to Postgres")?;

            ensure_schema(&pool)
                .await
                .context("failed to prepare catalog schema")?;

            tracing::info!("using Postgres stores");
            Ok(AppServices::new(
                Arc::new(PgSellerStore::new(pool.clone())),
                Arc::new(PgProductStore::new(pool)),
            ))
        }
    }
}
