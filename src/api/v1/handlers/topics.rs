/*
 * Responsibility
 * - /topicos CRUD handlers
 * - Reads are public; writes take `CurrentPrincipal`, so anonymous callers get 401
 * - A new topic's author is the caller bound by the bearer middleware
 */
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
};

use crate::api::v1::dto::topics::{
    CreateTopicRequest, PageParams, PageResponse, SearchParams, TopicResponse, UpdateTopicRequest,
};
use crate::api::v1::extractors::CurrentPrincipal;
use crate::error::AppError;
use crate::repos::topic_repo::{PageRequest, TopicFilter};
use crate::state::AppState;

/// Public location of a topic, mirrored in the `Location` header on create.
pub fn topic_location(id: i64) -> String {
    format!("/api/v1/topicos/{id}")
}

fn invalid(message: &'static str) -> AppError {
    AppError::bad_request("VALIDATION_ERROR", message)
}

pub async fn create_topic(
    State(state): State<AppState>,
    CurrentPrincipal(caller): CurrentPrincipal,
    Json(req): Json<CreateTopicRequest>,
) -> Result<(StatusCode, HeaderMap, Json<TopicResponse>), AppError> {
    req.validate().map_err(invalid)?;

    if state.topics.exists(&req.titulo, &req.mensaje).await? {
        return Err(AppError::bad_request(
            "DUPLICATE_TOPIC",
            "a topic with the same titulo and mensaje already exists",
        ));
    }

    let row = state
        .topics
        .create(req.into_new_topic(caller.user_id))
        .await?;
    tracing::info!(topic_id = row.id, author = %caller.subject, "topic created");

    let mut headers = HeaderMap::new();
    let location =
        HeaderValue::from_str(&topic_location(row.id)).map_err(|_| AppError::Internal)?;
    headers.insert(header::LOCATION, location);

    Ok((StatusCode::CREATED, headers, Json(TopicResponse::from(row))))
}

pub async fn get_topic(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TopicResponse>, AppError> {
    let row = state
        .topics
        .get(id)
        .await?
        .ok_or(AppError::not_found("topic"))?;

    Ok(Json(TopicResponse::from(row)))
}

pub async fn list_topics(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<PageResponse<TopicResponse>>, AppError> {
    let page = params.page_request().map_err(invalid)?;
    page_of(&state, &TopicFilter::default(), page).await
}

pub async fn search_topics(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<PageResponse<TopicResponse>>, AppError> {
    let page = params.page_request().map_err(invalid)?;
    page_of(&state, &params.filter(), page).await
}

async fn page_of(
    state: &AppState,
    filter: &TopicFilter,
    page: PageRequest,
) -> Result<Json<PageResponse<TopicResponse>>, AppError> {
    let (rows, total) = state.topics.list(filter, page).await?;
    let content = rows.into_iter().map(TopicResponse::from).collect();

    Ok(Json(PageResponse::new(content, page, total)))
}

pub async fn update_topic(
    State(state): State<AppState>,
    CurrentPrincipal(caller): CurrentPrincipal,
    Json(req): Json<UpdateTopicRequest>,
) -> Result<Json<TopicResponse>, AppError> {
    req.validate().map_err(invalid)?;

    let (id, changes) = req.into_changes();
    let row = state
        .topics
        .update(id, changes)
        .await?
        .ok_or(AppError::not_found("topic"))?;
    tracing::info!(topic_id = id, by = %caller.subject, "topic updated");

    Ok(Json(TopicResponse::from(row)))
}

pub async fn delete_topic(
    State(state): State<AppState>,
    CurrentPrincipal(caller): CurrentPrincipal,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if state.topics.delete(id).await? {
        tracing::info!(topic_id = id, by = %caller.subject, "topic deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("topic"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request},
    };
    use chrono::{Duration, NaiveDate};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::api::v1::routes;
    use crate::middleware::auth::{self, BearerScheme};
    use crate::repos::topic_repo::NewTopic;
    use crate::services::auth::{TokenCodec, testing::StaticLookup};
    use crate::services::topics::testing::{InMemoryTopics, author_name};

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";
    const ALICE: &str = "alice@example.com";

    struct Harness {
        app: Router,
        topics: Arc<InMemoryTopics>,
        token: String,
    }

    fn harness() -> Harness {
        let tokens = Arc::new(TokenCodec::new(SECRET, "foro-hub", Duration::hours(2), 0));
        let topics = Arc::new(InMemoryTopics::default());
        let state = AppState::new(
            tokens.clone(),
            Arc::new(StaticLookup::with_users(&[ALICE])),
            topics.clone(),
            BearerScheme::Tolerant,
        );
        let app = auth::apply(routes(), state.clone()).with_state(state);
        let token = tokens.issue_default(ALICE).unwrap();

        Harness { app, topics, token }
    }

    fn seed(topics: &InMemoryTopics, titulo: &str, curso: &str, year: i32) {
        let created = NaiveDate::from_ymd_opt(year, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        topics.seed(
            NewTopic {
                titulo: titulo.to_string(),
                mensaje: format!("{titulo} body"),
                curso: curso.to_string(),
                autor_id: 1,
            },
            created,
        );
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let res = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, value)
    }

    fn new_topic() -> Value {
        json!({
            "titulo": "Ownership",
            "mensaje": "Why does the borrow checker reject this?",
            "curso": "Rust"
        })
    }

    #[tokio::test]
    async fn writes_require_an_authenticated_caller() {
        let h = harness();

        let (status, _, _) = send(&h.app, Method::POST, "/topicos", None, Some(new_topic())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let update = json!({ "id": 1, "titulo": "x" });
        let (status, _, _) = send(&h.app, Method::PUT, "/topicos", None, Some(update)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _, _) = send(&h.app, Method::DELETE, "/topicos/1", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        assert_eq!(h.topics.count(), 0);
    }

    #[tokio::test]
    async fn create_credits_the_caller_and_points_to_the_new_topic() {
        let h = harness();

        // A client-supplied author id is ignored.
        let mut body = new_topic();
        body["usuarioId"] = json!(99);
        let (status, headers, topic) =
            send(&h.app, Method::POST, "/topicos", Some(h.token.as_str()), Some(body)).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(headers[header::LOCATION], "/api/v1/topicos/1");
        assert_eq!(topic["id"], 1);
        assert_eq!(topic["status"], "ABIERTO");
        assert_eq!(topic["nombreAutor"], author_name(1));
        assert!(topic["fechaDeCreacion"].is_string());

        let (status, _, fetched) = send(&h.app, Method::GET, "/topicos/1", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["titulo"], "Ownership");
    }

    #[tokio::test]
    async fn duplicate_title_and_message_is_rejected() {
        let h = harness();
        send(&h.app, Method::POST, "/topicos", Some(h.token.as_str()), Some(new_topic())).await;

        let (status, _, body) =
            send(&h.app, Method::POST, "/topicos", Some(h.token.as_str()), Some(new_topic())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "DUPLICATE_TOPIC");
        assert_eq!(h.topics.count(), 1);

        // Same title with another message is a different topic.
        let mut other = new_topic();
        other["mensaje"] = json!("A different question");
        let (status, _, _) = send(&h.app, Method::POST, "/topicos", Some(h.token.as_str()), Some(other)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn blank_fields_fail_validation_before_the_store() {
        let h = harness();
        let mut body = new_topic();
        body["curso"] = json!("  ");

        let (status, _, body) = send(&h.app, Method::POST, "/topicos", Some(h.token.as_str()), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(h.topics.count(), 0);
    }

    #[tokio::test]
    async fn missing_topic_is_404() {
        let h = harness();
        let (status, _, body) = send(&h.app, Method::GET, "/topicos/42", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "topic not found.");
    }

    #[tokio::test]
    async fn listing_is_paged_oldest_first() {
        let h = harness();
        for (i, year) in [2026, 2024, 2025].into_iter().enumerate() {
            seed(&h.topics, &format!("t{i}"), "Rust", year);
        }

        let (status, _, page) = send(&h.app, Method::GET, "/topicos?size=2", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["totalElements"], 3);
        assert_eq!(page["totalPages"], 2);
        let titles: Vec<&str> = page["content"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["titulo"].as_str().unwrap())
            .collect();
        assert_eq!(titles, ["t1", "t2"]);

        let (_, _, second) = send(&h.app, Method::GET, "/topicos?page=1&size=2", None, None).await;
        assert_eq!(second["content"][0]["titulo"], "t0");
        assert_eq!(second["page"], 1);

        let (status, _, _) = send(&h.app, Method::GET, "/topicos?size=0", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn search_filters_by_course_fragment_and_year() {
        let h = harness();
        seed(&h.topics, "a", "Spring Boot", 2025);
        seed(&h.topics, "b", "spring security", 2026);
        seed(&h.topics, "c", "Rust", 2026);

        let (_, _, both) = send(
            &h.app,
            Method::GET,
            "/topicos/buscar?curso=SPRING&anio=2026",
            None,
            None,
        )
        .await;
        assert_eq!(both["totalElements"], 1);
        assert_eq!(both["content"][0]["titulo"], "b");

        let (_, _, by_year) =
            send(&h.app, Method::GET, "/topicos/buscar?anio=2026", None, None).await;
        assert_eq!(by_year["totalElements"], 2);

        let (_, _, all) = send(&h.app, Method::GET, "/topicos/buscar", None, None).await;
        assert_eq!(all["totalElements"], 3);
    }

    #[tokio::test]
    async fn update_changes_only_the_given_fields() {
        let h = harness();
        seed(&h.topics, "old", "Rust", 2026);

        let change = json!({ "id": 1, "titulo": "new" });
        let (status, _, topic) =
            send(&h.app, Method::PUT, "/topicos", Some(h.token.as_str()), Some(change)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(topic["titulo"], "new");
        assert_eq!(topic["mensaje"], "old body");
        assert_eq!(topic["curso"], "Rust");

        let missing = json!({ "id": 7, "curso": "Go" });
        let (status, _, _) = send(&h.app, Method::PUT, "/topicos", Some(h.token.as_str()), Some(missing)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let blank = json!({ "id": 1, "titulo": "" });
        let (status, _, _) = send(&h.app, Method::PUT, "/topicos", Some(h.token.as_str()), Some(blank)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_is_permanent() {
        let h = harness();
        seed(&h.topics, "gone", "Rust", 2026);

        let (status, _, _) = send(&h.app, Method::DELETE, "/topicos/1", Some(h.token.as_str()), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(h.topics.count(), 0);

        let (status, _, _) = send(&h.app, Method::DELETE, "/topicos/1", Some(h.token.as_str()), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
