use axum::{
    Json,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::errors::ErrorDetail;

#[derive(Debug, Clone, Copy)]
pub struct ErrorPolicy {
    pub expose_fault_details: bool,
}

/// Turn error responses carrying an [`ErrorDetail`] into the JSON error body,
/// stamped with the request path and the current time.
///
/// Responses without a detail (successes, bare 404s) pass through untouched.
pub async fn render_error_bodies(
    State(policy): State<ErrorPolicy>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();

    let mut response = next.run(req).await;
    let Some(detail) = response.extensions_mut().remove::<ErrorDetail>() else {
        return response;
    };

    let status = response.status();
    let body = detail.into_body(status, path, policy.expose_fault_details);
    (status, Json(body)).into_response()
}
