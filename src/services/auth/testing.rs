//! In-memory `PrincipalLookup` doubles for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::repos::error::RepoError;
use crate::services::auth::principal::ROLE_USER;
use crate::services::auth::{LookupError, Principal, PrincipalLookup};

#[derive(Debug, Default)]
pub struct StaticLookup {
    principals: HashMap<String, Principal>,
    calls: AtomicUsize,
}

impl StaticLookup {
    pub fn with_users(subjects: &[&str]) -> Self {
        let principals = subjects
            .iter()
            .enumerate()
            .map(|(i, subject)| {
                let principal = Principal {
                    user_id: i as i64 + 1,
                    subject: subject.to_string(),
                    authorities: vec![ROLE_USER.to_string()],
                };
                (subject.to_string(), principal)
            })
            .collect();

        Self {
            principals,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PrincipalLookup for StaticLookup {
    async fn find_by_subject(&self, subject: &str) -> Result<Option<Principal>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.principals.get(subject).cloned())
    }
}

/// Simulates an unreachable data store.
#[derive(Debug, Default)]
pub struct BrokenLookup;

#[async_trait]
impl PrincipalLookup for BrokenLookup {
    async fn find_by_subject(&self, _subject: &str) -> Result<Option<Principal>, LookupError> {
        Err(LookupError::Repo(RepoError::Db(sqlx::Error::PoolTimedOut)))
    }
}
