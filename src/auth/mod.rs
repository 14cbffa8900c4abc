//! Authentication module for the marketplace
//!
//! - bcrypt password hashing
//! - HS256 access and refresh tokens
//! - Role and ownership guards
//! - Session resolution against live user records

mod error;
pub mod guard;
pub mod jwt;
mod password;
mod service;
mod session;

pub use error::{AuthError, ForbiddenReason};
pub use guard::{
    require_admin, require_buyer, require_owner, require_role, require_seller, Identity, Owned,
};
pub use jwt::{Claims, JwtKeys, TokenIssuer, TokenLifetimes, TokenType, TokenVerifier};
pub use password::PasswordHasher;
pub use service::{AuthService, TokenPair};
pub use session::SessionResolver;
