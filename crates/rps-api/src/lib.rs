pub mod calendar;
pub mod config;
pub mod error;
pub mod lesson;
pub mod metrics;
pub mod middleware;
pub mod progress;
pub mod quiz;
pub mod review;
pub mod router;
pub mod settings;
pub mod state;
pub mod tracing;
pub mod validation;

pub use config::ApiConfig;
pub use state::ApiState;
