//! Per-account locking
//!
//! - [`registry`] - identifier → lock handle map (one handle per account)
//! - [`coordinator`] - ordered, time-bounded acquisition of one or two handles
//! - [`state`] - states of a single coordinator invocation
//! - [`error`] - lock errors

pub mod coordinator;
pub mod error;
pub mod registry;
pub mod state;

pub use coordinator::LockCoordinator;
pub use error::LockError;
pub use registry::{LockGuard, LockHandle, LockRegistry};
pub use state::LockState;
