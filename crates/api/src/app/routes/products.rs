use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use sellerhub_catalog::ProductPayload;
use sellerhub_core::ProductId;

use crate::app::errors::ApiError;
use crate::app::links::LinkBuilder;
use crate::app::{dto, services::AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = body?;
    let product = services.products.create(payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    links: LinkBuilder,
) -> Result<impl IntoResponse, ApiError> {
    let products = services.products.list().await?;
    Ok(Json(dto::product_collection(&links, products)))
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    links: LinkBuilder,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: ProductId = dto::parse_id(&id)?;
    let product = services.products.get(id).await?;
    Ok(Json(dto::product_resource(&links, product)))
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    links: LinkBuilder,
    Path(id): Path<String>,
    body: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id: ProductId = dto::parse_id(&id)?;
    // An unknown id is a 404 whatever the body looks like.
    let payload = match body {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            services.products.get(id).await?;
            return Err(rejection.into());
        }
    };
    let product = services.products.update(id, payload).await?;
    Ok(Json(dto::product_resource(&links, product)))
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: ProductId = dto::parse_id(&id)?;
    services.products.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
