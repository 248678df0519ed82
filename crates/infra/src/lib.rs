//! Infrastructure layer: storage backends for the catalog ports.

pub mod store;
