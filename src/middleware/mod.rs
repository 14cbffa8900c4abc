//! Middleware for the marketplace API
//!
//! Bearer authentication extractors plus request tracing, rate limiting and
//! security headers.

pub mod auth;
mod rate_limiter;
mod security;
mod tracing;

pub use auth::{AdminUser, AuthenticatedUser, BuyerUser, SellerUser};
pub use rate_limiter::{rate_limit, RateLimiter};
pub use security::{hsts_header, security_headers};
pub use tracing::request_tracing;
