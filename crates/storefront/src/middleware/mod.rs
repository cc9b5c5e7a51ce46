//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (per-request nonce, CSP, frame, referrer)
//! 5. Session layer (tower-sessions with a bounded moka store)
//! 6. Rate limiting (governor, on checkout and signup routes only)

pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use rate_limit::{checkout_rate_limiter, signup_rate_limiter};
pub use request_id::request_id_middleware;
pub use security_headers::{PageNonce, security_headers_middleware};
pub use session::{MokaSessionStore, create_session_layer};
