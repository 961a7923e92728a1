//! # API Shared
//!
//! Shared definitions for the triage API.
//!
//! Contains:
//! - Request/response types with OpenAPI schemas (`types` module)
//! - `HealthService`
//! - Client access control (`auth` module)
//!
//! Used by `api-rest` and the `triage-run` binary.

pub mod auth;
pub mod health;
pub mod types;

pub use auth::{allowed_ip_from_env_value, validate_client_ip, AccessDenied};
pub use health::HealthService;
pub use types::*;
