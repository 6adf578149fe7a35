//! SplitAlgo HTTP client
//!
//! A typed client for the SplitAlgo REST API plus the sign-in flows built on
//! top of it. The session token is supplied through an explicit
//! [`Session`](splitalgo_core::Session) rather than ambient storage.

pub mod client;
pub mod services;

/// Request and response bodies
pub use splitalgo_core::types;

pub use client::error::ClientError;
pub use client::{ApiClient, ApiClientBuilder, DEFAULT_API_URL, Endpoint, RequestOptions};
pub use services::AuthService;
