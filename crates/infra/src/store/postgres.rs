//! Postgres-backed record stores.
//!
//! ## Error Mapping
//!
//! | SQLx error | PostgreSQL code | StoreError |
//! |------------|-----------------|------------|
//! | Database (unique violation) | `23505` | `Duplicate` |
//! | Database (other) | any | `Backend` |
//! | Column decode failure | n/a | `Corrupt` |
//! | Anything else (pool closed, IO, ...) | n/a | `Backend` |
//!
//! `products.seller_id` has no foreign key: the product handler checks the
//! reference and the seller handler cascades deletes.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::instrument;

use sellerhub_catalog::{Product, ProductStore, RecordStore, Seller, StoreError};
use sellerhub_core::{Entity, ProductId, SellerId};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS sellers (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        value NUMERIC NOT NULL,
        seller_id UUID NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS products_seller_id_idx ON products (seller_id)",
];

/// Create the catalog tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
    }
    Ok(())
}

/// Postgres-backed seller store (`sellers` table).
#[derive(Debug, Clone)]
pub struct PgSellerStore {
    pool: PgPool,
}

impl PgSellerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore<Seller> for PgSellerStore {
    #[instrument(skip_all, fields(seller_id = %record.id()), err)]
    async fn create(&self, record: Seller) -> Result<Seller, StoreError> {
        sqlx::query("INSERT INTO sellers (id, name, email) VALUES ($1, $2, $3)")
            .bind(record.id().as_uuid())
            .bind(record.name())
            .bind(record.email())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create_seller", e))?;
        Ok(record)
    }

    #[instrument(skip(self), err)]
    async fn find_by_id(&self, id: SellerId) -> Result<Option<Seller>, StoreError> {
        let row = sqlx::query("SELECT id, name, email FROM sellers WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_seller", e))?;
        row.as_ref().map(seller_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_all(&self) -> Result<Vec<Seller>, StoreError> {
        let rows = sqlx::query("SELECT id, name, email FROM sellers ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_sellers", e))?;
        rows.iter().map(seller_from_row).collect()
    }

    #[instrument(skip_all, fields(seller_id = %record.id()), err)]
    async fn save(&self, record: Seller) -> Result<Seller, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO sellers (id, name, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (id)
            DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                updated_at = NOW()
            "#,
        )
        .bind(record.id().as_uuid())
        .bind(record.name())
        .bind(record.email())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_seller", e))?;
        Ok(record)
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: SellerId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM sellers WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_seller", e))?;
        Ok(())
    }
}

/// Postgres-backed product store (`products` table).
#[derive(Debug, Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore<Product> for PgProductStore {
    #[instrument(skip_all, fields(product_id = %record.id()), err)]
    async fn create(&self, record: Product) -> Result<Product, StoreError> {
        sqlx::query("INSERT INTO products (id, name, value, seller_id) VALUES ($1, $2, $3, $4)")
            .bind(record.id().as_uuid())
            .bind(record.name())
            .bind(record.value())
            .bind(record.seller_id().as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create_product", e))?;
        Ok(record)
    }

    #[instrument(skip(self), err)]
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query("SELECT id, name, value, seller_id FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_product", e))?;
        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query("SELECT id, name, value, seller_id FROM products ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_products", e))?;
        rows.iter().map(product_from_row).collect()
    }

    #[instrument(skip_all, fields(product_id = %record.id()), err)]
    async fn save(&self, record: Product) -> Result<Product, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, value, seller_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id)
            DO UPDATE SET
                name = EXCLUDED.name,
                value = EXCLUDED.value,
                seller_id = EXCLUDED.seller_id,
                updated_at = NOW()
            "#,
        )
        .bind(record.id().as_uuid())
        .bind(record.name())
        .bind(record.value())
        .bind(record.seller_id().as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_product", e))?;
        Ok(record)
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_product", e))?;
        Ok(())
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    #[instrument(skip(self), err)]
    async fn find_by_seller(&self, seller_id: SellerId) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, name, value, seller_id FROM products WHERE seller_id = $1 ORDER BY id",
        )
        .bind(seller_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_products_by_seller", e))?;
        rows.iter().map(product_from_row).collect()
    }
}

fn seller_from_row(row: &PgRow) -> Result<Seller, StoreError> {
    let id: uuid::Uuid = row.try_get("id").map_err(corrupt)?;
    let name: String = row.try_get("name").map_err(corrupt)?;
    let email: String = row.try_get("email").map_err(corrupt)?;
    Ok(Seller::from_parts(SellerId::from_uuid(id), name, email))
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    let id: uuid::Uuid = row.try_get("id").map_err(corrupt)?;
    let name: String = row.try_get("name").map_err(corrupt)?;
    let value: Decimal = row.try_get("value").map_err(corrupt)?;
    let seller_id: uuid::Uuid = row.try_get("seller_id").map_err(corrupt)?;
    Ok(Product::from_parts(
        ProductId::from_uuid(id),
        name,
        value,
        SellerId::from_uuid(seller_id),
    ))
}

fn corrupt(err: sqlx::Error) -> StoreError {
    StoreError::Corrupt(err.to_string())
}

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Duplicate(msg),
                _ => StoreError::backend(operation, msg),
            }
        }
        sqlx::Error::PoolClosed => StoreError::backend(operation, "connection pool closed"),
        other => StoreError::backend(operation, other.to_string()),
    }
}
