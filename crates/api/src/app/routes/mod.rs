use axum::Router;

pub mod products;
pub mod sellers;
pub mod system;

/// Router for the resource endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/sellers", sellers::router())
        .nest("/products", products::router())
}
