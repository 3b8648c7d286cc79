/// Middleware module
///
/// Bearer authentication for protected scopes and per-request logging.

mod jwt_middleware;
mod request_logger;

pub use jwt_middleware::{bearer_token, JwtMiddleware};
pub use request_logger::RequestLogger;

/// Sent on every response, including errors raised before a handler runs
pub const SECURITY_HEADERS: [(&str, &str); 3] = [
    ("X-Content-Type-Options", "nosniff"),
    ("X-Frame-Options", "DENY"),
    ("Referrer-Policy", "no-referrer"),
];
