//! # API Shared
//!
//! Wire types and shared services for the MDR REST API.
//!
//! Contains:
//! - Request/response DTOs (`dto` module) with OpenAPI schemas
//! - Shared services like `HealthService`
//!
//! Core types stay free of API concerns; conversions live here.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
