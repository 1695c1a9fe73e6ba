use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::debug;

use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::auth::jwt::verify_token;
use crate::domain::access::Access;

/// JWT authentication extractor for protected routes
///
/// Rejects with 401 when the bearer token is missing or invalid. Wrap it in
/// `Option` on routes where authentication is optional.
///
/// Usage:
/// ```rust,ignore
/// async fn protected_handler(JwtAuth(access): JwtAuth) -> Result<String, ApiError> {
///     Ok(format!("Hello {}", access.principal()))
/// }
/// ```
pub struct JwtAuth(pub Access);

#[async_trait]
impl FromRequestParts<AppState> for JwtAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Authentification requise"))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::unauthorized("Format d'autorisation invalide. Utilisez : Bearer <token>")
        })?;

        let claims = verify_token(token, &state.jwt_secret).map_err(|e| {
            debug!(error = %e, "Rejected bearer token");
            ApiError::unauthorized("Jeton invalide ou expiré")
        })?;

        Ok(JwtAuth(claims.access()))
    }
}
