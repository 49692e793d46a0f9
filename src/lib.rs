// Core infrastructure modules
pub mod core;

pub mod operation; // Operation model, listeners and hierarchy
pub mod plugin;    // Plugin application tracking

// Re-exports for convenience
pub use self::core::errors::{Result, TrackerError};
pub use self::core::{init_tracing, TrackerConfig};
pub use operation::{
    ListenerBroadcast, OperationDescriptor, OperationDetails, OperationId, OperationListener,
    OperationParentTracker, ParentResolver,
};
pub use plugin::{PluginApplication, PluginApplicationTracker, PluginIdentifier, PROJECT_TARGET_TYPE};
