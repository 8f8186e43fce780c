//! In-memory `TopicStore` for router tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDateTime, Utc};

use crate::repos::error::RepoResult;
use crate::repos::topic_repo::{
    NewTopic, PageRequest, STATUS_OPEN, TopicChanges, TopicFilter, TopicRow,
};
use crate::services::topics::TopicStore;

#[derive(Debug, Default)]
pub struct InMemoryTopics {
    rows: Mutex<Vec<TopicRow>>,
}

pub fn author_name(autor_id: i64) -> String {
    format!("user-{autor_id}")
}

impl InMemoryTopics {
    /// Insert a topic with an explicit creation time.
    pub fn seed(&self, topic: NewTopic, created: NaiveDateTime) -> TopicRow {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let row = TopicRow {
            id,
            titulo: topic.titulo,
            mensaje: topic.mensaje,
            fecha_de_creacion: created,
            status: STATUS_OPEN.to_string(),
            curso: topic.curso,
            nombre_autor: author_name(topic.autor_id),
            autor_id: topic.autor_id,
        };
        rows.push(row.clone());
        row
    }

    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

fn matches(filter: &TopicFilter, row: &TopicRow) -> bool {
    let curso_ok = filter.curso.as_ref().is_none_or(|needle| {
        row.curso
            .to_lowercase()
            .contains(&needle.to_lowercase())
    });
    let anio_ok = filter
        .anio
        .is_none_or(|year| row.fecha_de_creacion.year() == year);
    curso_ok && anio_ok
}

#[async_trait]
impl TopicStore for InMemoryTopics {
    async fn exists(&self, titulo: &str, mensaje: &str) -> RepoResult<bool> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .any(|r| r.titulo == titulo && r.mensaje == mensaje))
    }

    async fn create(&self, topic: NewTopic) -> RepoResult<TopicRow> {
        Ok(self.seed(topic, Utc::now().naive_utc()))
    }

    async fn get(&self, id: i64) -> RepoResult<Option<TopicRow>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|r| r.id == id).cloned())
    }

    async fn list(
        &self,
        filter: &TopicFilter,
        page: PageRequest,
    ) -> RepoResult<(Vec<TopicRow>, i64)> {
        let rows = self.rows.lock().unwrap();
        let mut hits: Vec<TopicRow> = rows.iter().filter(|r| matches(filter, r)).cloned().collect();
        hits.sort_by_key(|r| (r.fecha_de_creacion, r.id));

        let total = hits.len() as i64;
        let content = hits
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok((content, total))
    }

    async fn update(&self, id: i64, changes: TopicChanges) -> RepoResult<Option<TopicRow>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        if let Some(titulo) = changes.titulo {
            row.titulo = titulo;
        }
        if let Some(mensaje) = changes.mensaje {
            row.mensaje = mensaje;
        }
        if let Some(curso) = changes.curso {
            row.curso = curso;
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() < before)
    }
}
