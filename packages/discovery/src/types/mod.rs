//! Domain types for discovery tasks and their results.

pub mod analysis;
pub mod business;
pub mod task;
pub mod thread;
