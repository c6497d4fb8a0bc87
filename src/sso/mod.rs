//! # SSO Module
//!
//! Federated sign-in through external OAuth2 identity providers:
//! - IdentityProvider abstraction and the Google, Facebook and GitHub variants
//! - SingleSignOn orchestration (code exchange, profile fetch, resolve-or-create)
//! - Sign-in and callback routes

pub mod handlers;
pub mod provider;
pub mod providers;
pub mod routes;
pub mod single_sign_on;


pub use provider::IdentityProvider;
pub use providers::{FacebookIdentityProvider, GithubIdentityProvider, GoogleIdentityProvider};
pub use routes::sso_routes;
pub use single_sign_on::{SingleSignOn, SingleSignOnFactory, SsoError};
