//! Record store backends.

pub mod in_memory;
pub mod postgres;

pub use in_memory::{InMemoryProductStore, InMemoryRecordStore, InMemorySellerStore};
pub use postgres::{PgProductStore, PgSellerStore, ensure_schema};
