// Core infrastructure shared by the trackers

pub mod config;
pub mod errors;
pub mod logging;

// Re-export commonly used types
pub use config::{TrackerConfig, TrackerConfigBuilder};
pub use errors::{Result, TrackerError};
pub use logging::init_tracing;
