/*
 * Responsibility
 * - SQLx reads against the `usuarios` table
 * - Only what authentication needs (lookup by login email); CRUD lives elsewhere
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoResult;

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
}

/// Exact-match lookup on the login email. `None` when no such user exists.
pub async fn find_by_email(db: &PgPool, email: &str) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, email
        FROM usuarios
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;

    Ok(row)
}
