//! Topic persistence seam. Handlers talk to `dyn TopicStore`; production wires
//! the Postgres repo behind it.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::repos::error::RepoResult;
use crate::repos::topic_repo::{
    self, NewTopic, PageRequest, TopicChanges, TopicFilter, TopicRow,
};

#[async_trait]
pub trait TopicStore: Send + Sync {
    async fn exists(&self, titulo: &str, mensaje: &str) -> RepoResult<bool>;

    async fn create(&self, topic: NewTopic) -> RepoResult<TopicRow>;

    async fn get(&self, id: i64) -> RepoResult<Option<TopicRow>>;

    /// One page of matching topics plus the total number of matches.
    async fn list(
        &self,
        filter: &TopicFilter,
        page: PageRequest,
    ) -> RepoResult<(Vec<TopicRow>, i64)>;

    async fn update(&self, id: i64, changes: TopicChanges) -> RepoResult<Option<TopicRow>>;

    async fn delete(&self, id: i64) -> RepoResult<bool>;
}

#[derive(Clone, Debug)]
pub struct PgTopicStore {
    db: PgPool,
}

impl PgTopicStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TopicStore for PgTopicStore {
    async fn exists(&self, titulo: &str, mensaje: &str) -> RepoResult<bool> {
        topic_repo::exists_by_titulo_and_mensaje(&self.db, titulo, mensaje).await
    }

    async fn create(&self, topic: NewTopic) -> RepoResult<TopicRow> {
        topic_repo::create(&self.db, &topic).await
    }

    async fn get(&self, id: i64) -> RepoResult<Option<TopicRow>> {
        topic_repo::get(&self.db, id).await
    }

    async fn list(
        &self,
        filter: &TopicFilter,
        page: PageRequest,
    ) -> RepoResult<(Vec<TopicRow>, i64)> {
        let rows = topic_repo::list(&self.db, filter, page).await?;
        let total = topic_repo::count(&self.db, filter).await?;
        Ok((rows, total))
    }

    async fn update(&self, id: i64, changes: TopicChanges) -> RepoResult<Option<TopicRow>> {
        topic_repo::update(&self.db, id, &changes).await
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        topic_repo::delete(&self.db, id).await
    }
}

pub fn build_topic_store(db: PgPool) -> Arc<dyn TopicStore> {
    Arc::new(PgTopicStore::new(db))
}
