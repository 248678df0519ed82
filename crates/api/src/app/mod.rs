//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store backends and the resource handlers built on them
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: JSON representations of records
//! - `links.rs`: navigation links attached to representations
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::config::ApiConfig;
use crate::middleware::{self, ErrorPolicy};

pub mod dto;
pub mod errors;
pub mod links;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &ApiConfig) -> anyhow::Result<Router> {
    let services = services::build_services(&config.storage).await?;
    Ok(router(services, config))
}

/// Assemble the router around already-built services.
pub fn router(services: services::AppServices, config: &ApiConfig) -> Router {
    let policy = ErrorPolicy {
        expose_fault_details: config.expose_fault_details,
    };
    let base_url = links::PublicBaseUrl(config.public_base_url.clone());

    // Layers listed outermost first; panics are caught innermost so the
    // error envelope can still stamp the 500 body.
    let stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn_with_state(
            policy,
            middleware::render_error_bodies,
        ))
        .layer(CatchPanicLayer::custom(errors::panic_response))
        .layer(Extension(Arc::new(services)))
        .layer(Extension(base_url));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(stack)
}
