/*
 * Responsibility
 * - Entry point of v1 (re-export routes())
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
