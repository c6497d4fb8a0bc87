//! Identity provider implementations

pub mod facebook;
pub mod github;
pub mod google;

pub use facebook::FacebookIdentityProvider;
pub use github::GithubIdentityProvider;
pub use google::GoogleIdentityProvider;
