use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use reqora_core::AppError;

use crate::auth;
use crate::error::ApiResult;

pub async fn require_auth(mut request: Request, next: Next) -> ApiResult<Response> {
    let identity = request
        .headers()
        .get(auth::PRINCIPAL_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))
        .and_then(auth::identity_from_principal_header)?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
