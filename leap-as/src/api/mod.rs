//! HTTP API handlers for leap-as

pub mod assess;
pub mod health;
pub mod progress;

pub use assess::assess_routes;
pub use health::health_routes;
pub use progress::progress_routes;
