//! vra-state
//!
//! Reads a vRealize Automation deployment through its resource-view API and
//! flattens the nested resource graph into a single declarative state record.
//!
//! # Module Structure
//!
//! - [`resource`] - Resource-graph flattening engine (the read-side core)
//! - [`vra`] - HTTP collaborator talking to the vRA catalog service
//! - [`state`] - Persisted state file for the last read
//! - [`config`] - User configuration
//! - [`error`] - Error types shared across the crate

pub mod config;
pub mod error;
pub mod resource;
pub mod state;
pub mod vra;

/// Version injected at compile time via VRA_STATE_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("VRA_STATE_VERSION") {
    Some(v) => v,
    None => "dev",
};
