//! Bearer token -> SecurityContext in request extensions.
//!
//! The middleware never rejects a request on its own. Missing, malformed,
//! expired, forged, or dangling-subject tokens all end in
//! `SecurityContext::Anonymous` and the request is forwarded; routes that need
//! a caller reject through the `CurrentPrincipal` extractor instead.
//!
//! The only error that escapes is a failure of the principal store itself.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};
use thiserror::Error;

use crate::api::v1::extractors::SecurityContext;
use crate::error::AppError;
use crate::services::auth::{LookupError, Principal, PrincipalLookup, TokenCodec, TokenError};
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// How strictly the `Authorization` value must follow `Bearer <token>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BearerScheme {
    /// Strip `Bearer ` when present, otherwise try the raw value as a token.
    #[default]
    Tolerant,
    /// Require the exact `Bearer ` prefix.
    Strict,
}

impl BearerScheme {
    fn token<'a>(&self, value: &'a str) -> Result<&'a str, AuthFailure> {
        let token = match (self, value.strip_prefix(BEARER_PREFIX)) {
            (_, Some(token)) => token,
            (Self::Tolerant, None) => value,
            (Self::Strict, None) => return Err(AuthFailure::Malformed),
        }
        .trim();

        if token.is_empty() {
            return Err(AuthFailure::Malformed);
        }
        Ok(token)
    }
}

/// Why a request proceeds unauthenticated.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("no credential presented")]
    MissingCredential,
    #[error("malformed credential")]
    Malformed,
    #[error("signature invalid")]
    SignatureInvalid,
    #[error("token expired")]
    Expired,
    #[error("unexpected issuer")]
    InvalidIssuer,
    #[error("principal not found")]
    PrincipalNotFound,
}

impl From<TokenError> for AuthFailure {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::SignatureInvalid => Self::SignatureInvalid,
            TokenError::Expired => Self::Expired,
            TokenError::InvalidIssuer => Self::InvalidIssuer,
            TokenError::Malformed
            | TokenError::EmptySubject
            | TokenError::InvalidTtl
            | TokenError::Signing(_) => Self::Malformed,
        }
    }
}

enum Authentication {
    Bound(Principal),
    Unauthenticated(AuthFailure),
}

/// Apply the bearer middleware to a router (usually the whole `/api/v1` tree).
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, bearer_middleware))
}

async fn bearer_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let ctx = authenticate(
        req.headers(),
        &state.tokens,
        state.principals.as_ref(),
        state.bearer_scheme,
    )
    .await?;

    // Built in full above; handlers only ever see the finished value.
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}

/// Decide the security context for one request.
pub async fn authenticate(
    headers: &HeaderMap,
    tokens: &TokenCodec,
    principals: &dyn PrincipalLookup,
    scheme: BearerScheme,
) -> Result<SecurityContext, LookupError> {
    match resolve(headers, tokens, principals, scheme).await? {
        Authentication::Bound(principal) => {
            tracing::debug!(subject = %principal.subject, "principal bound to request");
            Ok(SecurityContext::authenticated(principal))
        }
        Authentication::Unauthenticated(reason) => {
            tracing::debug!(%reason, "request proceeds unauthenticated");
            Ok(SecurityContext::Anonymous)
        }
    }
}

async fn resolve(
    headers: &HeaderMap,
    tokens: &TokenCodec,
    principals: &dyn PrincipalLookup,
    scheme: BearerScheme,
) -> Result<Authentication, LookupError> {
    let subject = match bearer_subject(headers, tokens, scheme) {
        Ok(subject) => subject,
        Err(reason) => return Ok(Authentication::Unauthenticated(reason)),
    };

    match principals.find_by_subject(&subject).await {
        Ok(Some(principal)) => Ok(Authentication::Bound(principal)),
        Ok(None) => Ok(Authentication::Unauthenticated(
            AuthFailure::PrincipalNotFound,
        )),
        Err(err) => {
            tracing::error!(error = %err, "principal lookup failed");
            Err(err)
        }
    }
}

fn bearer_subject(
    headers: &HeaderMap,
    tokens: &TokenCodec,
    scheme: BearerScheme,
) -> Result<String, AuthFailure> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthFailure::MissingCredential)?
        .to_str()
        .map_err(|_| AuthFailure::Malformed)?;

    let token = scheme.token(value)?;

    Ok(tokens.validate(token)?)
}
