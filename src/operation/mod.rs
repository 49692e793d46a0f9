//! Operation model shared by the trackers
//!
//! Descriptors and lifecycle events as the engine emits them, the listener
//! contract they are delivered through, and the parent hierarchy used for
//! ancestor queries.

pub mod hierarchy;
pub mod listener;
pub mod types;

pub use hierarchy::*;
pub use listener::*;
pub use types::*;
