//! # Auth Module
//!
//! This module handles session authentication:
//! - Signed session token encoding (HS256 JWT)
//! - Token issuance and expiry policy
//! - AuthedUser extractor for protected routes

pub mod authenticator;
pub mod extractors;
pub mod handlers;
pub mod routes;
pub mod token;


pub use authenticator::{AuthError, Authenticator};
pub use extractors::bearer_token;
pub use routes::auth_routes;
pub use token::{Jwt, TokenError};
