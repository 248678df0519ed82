//! Catalog module: sellers and the products they offer.
//!
//! Entities, inbound payload validation, the storage ports and the resource
//! handlers that orchestrate validate → resolve → mutate. No HTTP and no
//! storage backend lives here; backends implement [`store::RecordStore`].

pub mod error;
pub mod handlers;
pub mod product;
pub mod rules;
pub mod seller;
pub mod store;

pub use error::{CatalogError, Missing};
pub use handlers::{ProductHandler, SellerHandler};
pub use product::{DecimalText, Product, ProductPayload, ProductRecord, ProductView};
pub use seller::{Seller, SellerPayload, SellerRecord};
pub use store::{ProductStore, RecordStore, SellerStore, StoreError};
