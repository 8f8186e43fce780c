use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::Principal;

use super::SecurityContext;

/// Reads the context the bearer middleware stored in `request.extensions()`.
/// A request that never went through the middleware reads as anonymous.
impl<S> FromRequestParts<S> for SecurityContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<SecurityContext>()
            .cloned()
            .unwrap_or_default())
    }
}

/// Handler extractor for routes that require a caller.
/// Returns 401 when the request is anonymous.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Arc<Principal>);

impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<SecurityContext>() {
            Some(SecurityContext::Authenticated(principal)) => {
                Ok(CurrentPrincipal(Arc::clone(principal)))
            }
            _ => Err(AppError::Unauthorized),
        }
    }
}
