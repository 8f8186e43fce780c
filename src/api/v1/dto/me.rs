use serde::Serialize;

use crate::services::auth::Principal;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: i64,
    pub subject: String,
    pub authorities: Vec<String>,
}

impl From<&Principal> for MeResponse {
    fn from(p: &Principal) -> Self {
        Self {
            user_id: p.user_id,
            subject: p.subject.clone(),
            authorities: p.authorities.clone(),
        }
    }
}
