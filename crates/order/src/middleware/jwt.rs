use axum::{
    Extension,
    body::Body,
    http::{Request, header},
    middleware::Next,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use shared::{abstract_trait::DynJwtService, errors::HttpError};
use tracing::warn;

/// Resolves the caller from the `token` cookie or a bearer header and stores
/// their [`shared::config::CustomerClaims`] as a request extension.
pub async fn auth_middleware(
    cookie_jar: CookieJar,
    Extension(jwt): Extension<DynJwtService>,
    mut req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let token = cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer ").map(str::to_owned))
        })
        .ok_or_else(|| {
            HttpError::Unauthorized("You are not logged in, please provide token".into())
        })?;

    let customer = jwt.verify_token(&token, "access").map_err(|e| {
        warn!("🔐 Rejected access token: {e}");
        HttpError::Unauthorized("Invalid token".into())
    })?;

    req.extensions_mut().insert(customer);

    Ok(next.run(req).await)
}
