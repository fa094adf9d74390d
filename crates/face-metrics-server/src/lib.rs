//! Face Metrics server library.
//!
//! Split from the binary so the HTTP surface can be exercised in-process
//! by integration tests with mock-backed pipelines.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{AppConfig, CliOverrides};
pub use routes::router;
pub use state::AppState;
