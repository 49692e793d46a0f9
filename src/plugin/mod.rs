//! Plugin applications and the tracker that follows them

pub mod application;
pub mod identifier;
pub mod tracker;

pub use application::*;
pub use identifier::*;
pub use tracker::*;
