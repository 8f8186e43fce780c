/*
 * Responsibility
 * - URL layout of v1
 * - Public routes and caller-only routes share one tree; the bearer middleware
 *   wraps all of it and `CurrentPrincipal` gates the caller-only handlers
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{health::health, hello::hello, me::me, topics};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/hello", get(hello))
        .route("/me", get(me))
        .route(
            "/topicos",
            get(topics::list_topics)
                .post(topics::create_topic)
                .put(topics::update_topic),
        )
        .route("/topicos/buscar", get(topics::search_topics))
        .route(
            "/topicos/{id}",
            get(topics::get_topic).delete(topics::delete_topic),
        )
}
