use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use sellerhub_catalog::SellerPayload;
use sellerhub_core::SellerId;

use crate::app::errors::ApiError;
use crate::app::links::LinkBuilder;
use crate::app::{dto, services::AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_sellers).post(create_seller))
        .route(
            "/:id",
            get(get_seller).put(update_seller).delete(delete_seller),
        )
}

pub async fn create_seller(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<SellerPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = body?;
    let seller = services.sellers.create(payload).await?;
    Ok((StatusCode::CREATED, Json(seller)))
}

pub async fn list_sellers(
    Extension(services): Extension<Arc<AppServices>>,
    links: LinkBuilder,
) -> Result<impl IntoResponse, ApiError> {
    let sellers = services.sellers.list().await?;
    Ok(Json(dto::seller_collection(&links, sellers)))
}

pub async fn get_seller(
    Extension(services): Extension<Arc<AppServices>>,
    links: LinkBuilder,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: SellerId = dto::parse_id(&id)?;
    let seller = services.sellers.get(id).await?;
    Ok(Json(dto::seller_resource(&links, seller)))
}

pub async fn update_seller(
    Extension(services): Extension<Arc<AppServices>>,
    links: LinkBuilder,
    Path(id): Path<String>,
    body: Result<Json<SellerPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id: SellerId = dto::parse_id(&id)?;
    // An unknown id is a 404 whatever the body looks like.
    let payload = match body {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            services.sellers.get(id).await?;
            return Err(rejection.into());
        }
    };
    let seller = services.sellers.update(id, payload).await?;
    Ok(Json(dto::seller_resource(&links, seller)))
}

pub async fn delete_seller(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: SellerId = dto::parse_id(&id)?;
    services.sellers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
