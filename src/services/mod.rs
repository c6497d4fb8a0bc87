// src/services/mod.rs
//
// Shared infrastructure services used by the domain modules

pub mod http;
pub mod monitoring;

// Re-export commonly used types for convenience
pub use http::HttpClient;
