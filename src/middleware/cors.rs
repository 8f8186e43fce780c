//! CORS policy for browser clients.
//!
//! Policy:
//! - Development: permissive (Allow-Origin: *), WITHOUT credentials.
//! - Production: allowlist origins from Config, WITHOUT credentials.
//!   An empty allowlist allows no cross-origin callers.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::AppEnv;
use crate::middleware::http::REQUEST_ID_HEADER;

pub fn apply(router: Router, app_env: AppEnv, allowed_origins: &[String]) -> Router {
    let cors = if app_env.is_production() {
        let allowed: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        CorsLayer::new().allow_origin(AllowOrigin::list(allowed))
    } else {
        CorsLayer::new().allow_origin(Any)
    }
    .allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ])
    // The bearer credential travels in Authorization.
    .allow_headers([
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        header::ACCEPT,
        HeaderName::from_static(REQUEST_ID_HEADER),
    ])
    .max_age(std::time::Duration::from_secs(60 * 10));

    router.layer(cors)
}
