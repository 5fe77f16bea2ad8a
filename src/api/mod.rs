//! HTTP API for the subtask generation service.
//!
//! ## Endpoints
//!
//! - `POST /generate-items` - Decompose a task title into subtasks
//! - `GET /health` - Health check

mod routes;
pub mod types;

pub use routes::{router, serve, AppState};
pub use types::*;
