/*
 * Responsibility
 * - The "who is calling" value handlers see
 * - The bearer middleware builds it in full and inserts it into request extensions once
 *
 * Notes
 * - It is owned by the request; dropping the request (completion, error, panic,
 *   timeout cancellation) drops it. There is no process-wide holder.
 */
use std::sync::Arc;

use crate::services::auth::Principal;

/// Authentication state of one request.
#[derive(Debug, Clone, Default)]
pub enum SecurityContext {
    #[default]
    Anonymous,
    Authenticated(Arc<Principal>),
}

impl SecurityContext {
    pub fn authenticated(principal: Principal) -> Self {
        Self::Authenticated(Arc::new(principal))
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Authenticated(p) => Some(p),
            Self::Anonymous => None,
        }
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.principal()
            .is_some_and(|p| p.has_authority(authority))
    }
}
