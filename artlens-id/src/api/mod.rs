//! HTTP API handlers for artlens-id
//!
//! - `POST /api/identify`: run the identification pipeline on one photo
//! - `GET /health`: liveness and diagnostics

pub mod health;
pub mod identify;

pub use health::health_routes;
pub use identify::identify_routes;
