//! Resource handlers: validate → look up → mutate → hand back the stored record.
//!
//! Handlers are plain values holding their stores; the HTTP layer builds them
//! once at startup and shares them across requests.

mod product;
mod seller;

pub use product::ProductHandler;
pub use seller::SellerHandler;
