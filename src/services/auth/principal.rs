//! Principal resolution: token subject -> identity + granted authorities.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::repos::{error::RepoError, user_repo};

/// Authority every registered user holds.
pub const ROLE_USER: &str = "ROLE_USER";

/// The caller behind a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    /// Login identifier (normalized email); equals the token `sub`.
    pub subject: String,
    pub authorities: Vec<String>,
}

impl Principal {
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Maps token subjects to principals.
///
/// - `Ok(Some(_))`: subject resolved
/// - `Ok(None)`: no such principal (not an error; the token may outlive its user)
/// - `Err(_)`: the backing store itself failed
#[async_trait]
pub trait PrincipalLookup: Send + Sync {
    async fn find_by_subject(&self, subject: &str) -> Result<Option<Principal>, LookupError>;
}

/// Postgres-backed lookup over the `usuarios` table.
#[derive(Clone, Debug)]
pub struct PgPrincipalLookup {
    db: PgPool,
}

impl PgPrincipalLookup {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PrincipalLookup for PgPrincipalLookup {
    async fn find_by_subject(&self, subject: &str) -> Result<Option<Principal>, LookupError> {
        let row = user_repo::find_by_email(&self.db, subject).await?;

        Ok(row.map(|u| Principal {
            user_id: u.id,
            subject: u.email,
            authorities: vec![ROLE_USER.to_string()],
        }))
    }
}
