//! Storage ports consumed by the resource handlers.
//!
//! Backends live in `sellerhub-infra` (in-memory for dev/tests, Postgres for
//! deployments). Every method is a single atomic operation on one record; there
//! is no cross-call transaction.

use async_trait::async_trait;
use thiserror::Error;

use sellerhub_core::{Entity, SellerId};

use crate::product::Product;
use crate::seller::Seller;

/// Storage operation error.
///
/// Infrastructure failures only: "record absent" is `Ok(None)` from
/// [`RecordStore::find_by_id`], never an error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `create` was given an identifier that is already stored.
    #[error("duplicate identifier: {0}")]
    Duplicate(String),

    /// A stored row could not be turned back into an entity.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// The backend failed (connection, query, lock poisoning, ...).
    #[error("storage failure in {operation}: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn backend(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            operation,
            message: message.into(),
        }
    }
}

/// Generic identifier-keyed record store.
#[async_trait]
pub trait RecordStore<E>: Send + Sync
where
    E: Entity + Send + Sync + 'static,
{
    /// Insert a record under its (already generated) identifier.
    async fn create(&self, record: E) -> Result<E, StoreError>;

    async fn find_by_id(&self, id: E::Id) -> Result<Option<E>, StoreError>;

    /// All records, oldest first.
    async fn find_all(&self) -> Result<Vec<E>, StoreError>;

    /// Insert or replace the record stored under its identifier.
    async fn save(&self, record: E) -> Result<E, StoreError>;

    /// Remove a record. Removing an absent id is not an error.
    async fn delete(&self, id: E::Id) -> Result<(), StoreError>;
}

/// Seller storage.
pub trait SellerStore: RecordStore<Seller> {}

impl<T> SellerStore for T where T: RecordStore<Seller> + ?Sized {}

/// Product storage, with the seller back-reference lookup used by cascades.
#[async_trait]
pub trait ProductStore: RecordStore<Product> {
    async fn find_by_seller(&self, seller_id: SellerId) -> Result<Vec<Product>, StoreError>;
}
