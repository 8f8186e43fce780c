/*
 * Responsibility
 * - Public interface of the middleware layers
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
