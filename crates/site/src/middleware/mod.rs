//! HTTP middleware stack for the public site.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request spans with status and latency)
//! 3. Request ID
//! 4. Security headers
//! 5. Visitor tracking
//! 6. Rate limiting (form POST routes only)

pub mod client_ip;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod visitor;

pub use client_ip::ClientIp;
pub use rate_limit::form_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use visitor::track_visits;
