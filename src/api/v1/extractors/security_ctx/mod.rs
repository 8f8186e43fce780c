/*!
 * Security context extractor
 *
 * Responsibility:
 * - Hand the request's SecurityContext to handlers
 * - Provide the "authenticated or not" gate (CurrentPrincipal)
 *
 * Public API:
 * - SecurityContext
 * - CurrentPrincipal
 */

mod core;
mod types;

pub use self::core::CurrentPrincipal;
pub use types::SecurityContext;
