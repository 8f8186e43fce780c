/*
 * Responsibility
 * - topicos CRUD against Postgres
 * - Every read joins `usuarios` so responses can carry the author's name
 * - Paging is LIMIT/OFFSET ordered by creation time (oldest first), id as tie-breaker
 */
use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoResult;

/// Status every new topic starts in.
pub const STATUS_OPEN: &str = "ABIERTO";

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TopicRow {
    pub id: i64,
    pub titulo: String,
    pub mensaje: String,
    pub fecha_de_creacion: NaiveDateTime,
    pub status: String,
    pub curso: String,
    pub autor_id: i64,
    pub nombre_autor: String,
}

#[derive(Debug, Clone)]
pub struct NewTopic {
    pub titulo: String,
    pub mensaje: String,
    pub curso: String,
    pub autor_id: i64,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct TopicChanges {
    pub titulo: Option<String>,
    pub mensaje: Option<String>,
    pub curso: Option<String>,
}

/// Optional filters for listings. Each present filter narrows the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicFilter {
    /// Case-insensitive substring of the course name.
    pub curso: Option<String>,
    /// Calendar year of `fecha_de_creacion`.
    pub anio: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }
}

const SELECT_TOPIC: &str = r#"
    SELECT
        t.id, t.titulo, t.mensaje, t.fecha_de_creacion, t.status, t.curso,
        t.usuario_id AS autor_id, u.nombre AS nombre_autor
    FROM topicos t
    JOIN usuarios u ON u.id = t.usuario_id
"#;

const FILTER: &str = r#"
    WHERE ($1::text IS NULL OR strpos(lower(t.curso), lower($1)) > 0)
      AND ($2::int IS NULL OR EXTRACT(YEAR FROM t.fecha_de_creacion)::int = $2)
"#;

pub async fn exists_by_titulo_and_mensaje(
    db: &PgPool,
    titulo: &str,
    mensaje: &str,
) -> RepoResult<bool> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM topicos WHERE titulo = $1 AND mensaje = $2
        )
        "#,
    )
    .bind(titulo)
    .bind(mensaje)
    .fetch_one(db)
    .await?;

    Ok(exists)
}

pub async fn create(db: &PgPool, topic: &NewTopic) -> RepoResult<TopicRow> {
    let row = sqlx::query_as::<_, TopicRow>(
        r#"
        WITH t AS (
            INSERT INTO topicos (activo, titulo, mensaje, fecha_de_creacion, status, curso, usuario_id)
            VALUES (TRUE, $1, $2, LOCALTIMESTAMP, $3, $4, $5)
            RETURNING id, titulo, mensaje, fecha_de_creacion, status, curso, usuario_id
        )
        SELECT
            t.id, t.titulo, t.mensaje, t.fecha_de_creacion, t.status, t.curso,
            t.usuario_id AS autor_id, u.nombre AS nombre_autor
        FROM t
        JOIN usuarios u ON u.id = t.usuario_id
        "#,
    )
    .bind(&topic.titulo)
    .bind(&topic.mensaje)
    .bind(STATUS_OPEN)
    .bind(&topic.curso)
    .bind(topic.autor_id)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn get(db: &PgPool, id: i64) -> RepoResult<Option<TopicRow>> {
    let row = sqlx::query_as::<_, TopicRow>(&format!("{SELECT_TOPIC} WHERE t.id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await?;

    Ok(row)
}

pub async fn list(
    db: &PgPool,
    filter: &TopicFilter,
    page: PageRequest,
) -> RepoResult<Vec<TopicRow>> {
    let rows = sqlx::query_as::<_, TopicRow>(&format!(
        "{SELECT_TOPIC} {FILTER} ORDER BY t.fecha_de_creacion, t.id LIMIT $3 OFFSET $4"
    ))
    .bind(filter.curso.as_deref())
    .bind(filter.anio)
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn count(db: &PgPool, filter: &TopicFilter) -> RepoResult<i64> {
    let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM topicos t {FILTER}"))
        .bind(filter.curso.as_deref())
        .bind(filter.anio)
        .fetch_one(db)
        .await?;

    Ok(total)
}

pub async fn update(
    db: &PgPool,
    id: i64,
    changes: &TopicChanges,
) -> RepoResult<Option<TopicRow>> {
    let row = sqlx::query_as::<_, TopicRow>(
        r#"
        WITH t AS (
            UPDATE topicos
            SET
                titulo = COALESCE($2, titulo),
                mensaje = COALESCE($3, mensaje),
                curso = COALESCE($4, curso)
            WHERE id = $1
            RETURNING id, titulo, mensaje, fecha_de_creacion, status, curso, usuario_id
        )
        SELECT
            t.id, t.titulo, t.mensaje, t.fecha_de_creacion, t.status, t.curso,
            t.usuario_id AS autor_id, u.nombre AS nombre_autor
        FROM t
        JOIN usuarios u ON u.id = t.usuario_id
        "#,
    )
    .bind(id)
    .bind(changes.titulo.as_deref())
    .bind(changes.mensaje.as_deref())
    .bind(changes.curso.as_deref())
    .fetch_optional(db)
    .await?;

    Ok(row)
}

/// Hard delete. `false` when no topic had that id.
pub async fn delete(db: &PgPool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM topicos WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}
