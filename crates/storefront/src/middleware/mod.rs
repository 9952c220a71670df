//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transaction per route)
//! 2. `TraceLayer` (request spans)
//! 3. Request ID (correlation id on span, Sentry scope and response)
//! 4. Security headers
//! 5. Session guard (`auth_token` verification and redirects)

pub mod request_id;
pub mod security_headers;
pub mod session_guard;

pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session_guard::session_guard_middleware;
