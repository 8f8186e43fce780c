/*
 * Responsibility
 * - GET /me (who am I; 401 when anonymous)
 */
use axum::Json;

use crate::api::v1::dto::me::MeResponse;
use crate::api::v1::extractors::CurrentPrincipal;

pub async fn me(CurrentPrincipal(principal): CurrentPrincipal) -> Json<MeResponse> {
    Json(MeResponse::from(principal.as_ref()))
}
