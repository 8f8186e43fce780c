/*
 * Responsibility
 * - GET /hello (public greeting, reachable with or without a token)
 */
use crate::api::v1::extractors::SecurityContext;

pub async fn hello(ctx: SecurityContext) -> String {
    match ctx.principal() {
        Some(p) => format!("Hello {}! Welcome to Foro Hub.", p.subject),
        None => "Hello World! Welcome to Foro Hub.".to_string(),
    }
}
