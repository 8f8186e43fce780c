/*
 * Responsibility
 * - Topic request/response DTOs (camelCase on the wire, Spanish field names kept)
 * - Field validation happens here, before anything touches the store
 * - The author is the authenticated caller, never a body field
 */
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::repos::topic_repo::{NewTopic, PageRequest, TopicChanges, TopicFilter, TopicRow};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct CreateTopicRequest {
    pub titulo: String,
    pub mensaje: String,
    pub curso: String,
}

impl CreateTopicRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.titulo.trim().is_empty() {
            return Err("titulo is required");
        }
        if self.mensaje.trim().is_empty() {
            return Err("mensaje is required");
        }
        if self.curso.trim().is_empty() {
            return Err("curso is required");
        }

        Ok(())
    }

    pub fn into_new_topic(self, autor_id: i64) -> NewTopic {
        NewTopic {
            titulo: self.titulo,
            mensaje: self.mensaje,
            curso: self.curso,
            autor_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateTopicRequest {
    pub id: i64,
    pub titulo: Option<String>,
    pub mensaje: Option<String>,
    pub curso: Option<String>,
}

impl UpdateTopicRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(titulo) = &self.titulo
            && titulo.trim().is_empty()
        {
            return Err("titulo cannot be empty");
        }
        if let Some(mensaje) = &self.mensaje
            && mensaje.trim().is_empty()
        {
            return Err("mensaje cannot be empty");
        }
        if let Some(curso) = &self.curso
            && curso.trim().is_empty()
        {
            return Err("curso cannot be empty");
        }

        Ok(())
    }

    pub fn into_changes(self) -> (i64, TopicChanges) {
        (
            self.id,
            TopicChanges {
                titulo: self.titulo,
                mensaje: self.mensaje,
                curso: self.curso,
            },
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicResponse {
    pub id: i64,
    pub titulo: String,
    pub mensaje: String,
    pub fecha_de_creacion: NaiveDateTime,
    pub curso: String,
    pub nombre_autor: String,
    pub status: String,
}

impl From<TopicRow> for TopicResponse {
    fn from(row: TopicRow) -> Self {
        Self {
            id: row.id,
            titulo: row.titulo,
            mensaje: row.mensaje,
            fecha_de_creacion: row.fecha_de_creacion,
            curso: row.curso,
            nombre_autor: row.nombre_autor,
            status: row.status,
        }
    }
}

/// `?page=&size=`; page is zero-based.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl PageParams {
    pub fn page_request(&self) -> Result<PageRequest, &'static str> {
        page_request(self.page, self.size)
    }
}

/// `?curso=&anio=&page=&size=`
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub curso: Option<String>,
    pub anio: Option<i32>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl SearchParams {
    pub fn filter(&self) -> TopicFilter {
        TopicFilter {
            curso: self
                .curso
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            anio: self.anio,
        }
    }

    pub fn page_request(&self) -> Result<PageRequest, &'static str> {
        page_request(self.page, self.size)
    }
}

fn page_request(page: Option<u32>, size: Option<u32>) -> Result<PageRequest, &'static str> {
    let size = size.unwrap_or(DEFAULT_PAGE_SIZE);
    if size == 0 || size > MAX_PAGE_SIZE {
        return Err("size must be between 1 and 100");
    }

    Ok(PageRequest {
        page: page.unwrap_or(0),
        size,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: i64,
    pub total_pages: i64,
}

impl<T> PageResponse<T> {
    pub fn new(content: Vec<T>, page: PageRequest, total_elements: i64) -> Self {
        let size = i64::from(page.size);
        Self {
            content,
            page: page.page,
            size: page.size,
            total_elements,
            total_pages: (total_elements + size - 1) / size,
        }
    }
}
