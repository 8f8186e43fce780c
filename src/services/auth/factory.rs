/// Factories: build auth services from application `Config`.
use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::services::auth::{PrincipalLookup, TokenCodec, principal::PgPrincipalLookup};

pub fn build_token_codec(config: &Config) -> Arc<TokenCodec> {
    Arc::new(TokenCodec::new(
        config.jwt_secret.as_bytes(),
        config.auth_issuer.clone(),
        config.access_token_ttl,
        config.access_token_leeway_seconds,
    ))
}

pub fn build_principal_lookup(db: PgPool) -> Arc<dyn PrincipalLookup> {
    Arc::new(PgPrincipalLookup::new(db))
}
