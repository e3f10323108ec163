//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request spans with status and latency)
//! 3. Security headers (no caching, no framing)
//! 4. Session layer (tower-sessions with `PostgreSQL` store)
//!
//! The login and create-account POST handlers also carry a per-IP
//! `tower_governor` limit.
//!
//! Authentication is enforced per handler with the [`RequireAdminAuth`]
//! extractor rather than a layer, so `/auth/*` and `/health*` stay open.

pub mod auth;
pub mod client_ip;
pub mod rate_limit;
pub mod security_headers;
pub mod session;

pub use auth::{OptionalAdminAuth, RequireAdminAuth, clear_current_admin, set_current_admin};
pub use client_ip::ClientIp;
pub use rate_limit::auth_rate_limiter;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
