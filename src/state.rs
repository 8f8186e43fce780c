/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 * - Cheap to Clone (everything behind Arc / Copy)
 */
use std::sync::Arc;

use crate::middleware::auth::BearerScheme;
use crate::services::auth::{PrincipalLookup, TokenCodec};
use crate::services::topics::TopicStore;

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenCodec>,
    pub principals: Arc<dyn PrincipalLookup>,
    pub topics: Arc<dyn TopicStore>,
    pub bearer_scheme: BearerScheme,
}

impl AppState {
    pub fn new(
        tokens: Arc<TokenCodec>,
        principals: Arc<dyn PrincipalLookup>,
        topics: Arc<dyn TopicStore>,
        bearer_scheme: BearerScheme,
    ) -> Self {
        Self {
            tokens,
            principals,
            topics,
            bearer_scheme,
        }
    }
}
