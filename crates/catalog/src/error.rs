use thiserror::Error;

use sellerhub_core::{FieldErrors, ProductId, SellerId};

use crate::store::StoreError;

/// Which record a lookup failed to find.
///
/// The HTTP surface answers all of these with the same bare 404; the variants
/// exist so logs can tell a missing product from a missing referenced seller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Seller(SellerId),
    Product(ProductId),
    /// The `sellerId` carried by a product payload does not exist.
    ReferencedSeller(SellerId),
}

impl core::fmt::Display for Missing {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Missing::Seller(id) => write!(f, "seller {id} not found"),
            Missing::Product(id) => write!(f, "product {id} not found"),
            Missing::ReferencedSeller(id) => write!(f, "referenced seller {id} not found"),
        }
    }
}

/// Failure of a resource handler operation.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("{0}")]
    NotFound(Missing),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<FieldErrors> for CatalogError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}
