//! # Users Module
//!
//! Local user records and the store the sign-in flow resolves identities against.

pub mod manager;
pub mod models;
pub mod repository;

#[cfg(test)]
mod tests;

pub use manager::UserManager;
pub use models::{NewUser, User};
pub use repository::{RepositoryError, SqliteUserRepository, UserRepository};
