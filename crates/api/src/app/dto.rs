use core::str::FromStr;

use sellerhub_catalog::{ProductView, Seller};
use sellerhub_core::Entity;

use crate::app::errors::ApiError;
use crate::app::links::{CollectionResource, LinkBuilder, Resource};

pub const SELLERS: &str = "sellers";
pub const PRODUCTS: &str = "products";

// -------------------------
// Path parameters
// -------------------------

/// Parse a path identifier. Text that is not an id names no record, so it is
/// answered like any other absent id.
pub fn parse_id<T: FromStr>(raw: &str) -> Result<T, ApiError> {
    raw.parse().map_err(|_| {
        tracing::debug!(id = raw, "unparseable id in path");
        ApiError::NotFound
    })
}

// -------------------------
// Response representations
// -------------------------

pub fn seller_resource(links: &LinkBuilder, seller: Seller) -> Resource<Seller> {
    Resource {
        links: links.item(SELLERS, seller.id()),
        record: seller,
    }
}

pub fn seller_collection(links: &LinkBuilder, sellers: Vec<Seller>) -> CollectionResource<Seller> {
    let items = sellers
        .into_iter()
        .map(|s| seller_resource(links, s))
        .collect();
    CollectionResource::new(SELLERS, items, links.collection(SELLERS))
}

pub fn product_resource(links: &LinkBuilder, product: ProductView) -> Resource<ProductView> {
    Resource {
        links: links.item(PRODUCTS, product.id),
        record: product,
    }
}

pub fn product_collection(
    links: &LinkBuilder,
    products: Vec<ProductView>,
) -> CollectionResource<ProductView> {
    let items = products
        .into_iter()
        .map(|p| product_resource(links, p))
        .collect();
    CollectionResource::new(PRODUCTS, items, links.collection(PRODUCTS))
}
